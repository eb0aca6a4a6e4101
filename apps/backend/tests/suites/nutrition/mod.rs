mod aggregation;
mod dashboard;
mod props;
