pub mod common_types;
