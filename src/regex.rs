//! Regex backend selection: `regex` (default) or `regex_lite` via the
//! `lite` feature.

#[cfg(feature = "lite")]
pub(crate) use regex_lite::Regex;
#[cfg(all(feature = "regex", not(feature = "lite")))]
pub(crate) use regex::Regex;

#[cfg(not(any(feature = "regex", feature = "lite")))]
compile_error!("manubib requires the \"regex\" or \"lite\" feature to be enabled");
