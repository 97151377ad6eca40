pub mod db;
pub mod errors;
pub mod product;

#[cfg(test)]
mod tests;
