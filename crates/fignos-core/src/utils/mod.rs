pub mod diagnostic_collector;
