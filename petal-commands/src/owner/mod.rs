pub mod prefixes;
