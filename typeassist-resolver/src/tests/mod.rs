mod test_assignment;
mod test_config;
mod test_evaluators;
mod test_resolver;
mod test_signature;
mod test_walker;
