pub mod expenses;
