mod model;
mod pipeline_scenarios;
mod support;
