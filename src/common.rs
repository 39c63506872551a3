pub mod db_utils;
pub mod dates;
pub mod error;
pub mod format;

#[cfg(test)]
pub mod test_support;
