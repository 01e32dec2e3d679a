pub mod model;

pub mod segmenter;

pub mod splits;

pub mod tree;

#[cfg(test)]
pub(crate) mod test_corpus;

#[cfg(test)]
mod segmenter_tests;
