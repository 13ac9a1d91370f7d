mod test_declarations;
mod test_types;
