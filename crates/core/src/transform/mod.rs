//! Source record to Well Data Layer mapping
//!
//! Pure functions: no I/O, no destination calls. Each loader stage fetches
//! with a [`SourceClient`](crate::source::SourceClient), maps here and writes
//! through a [`WellDataLayer`](crate::destination::WellDataLayer).

pub mod measurements;
pub mod trajectories;
pub mod units;
pub mod well_tops;
pub mod wells;

use once_cell::sync::Lazy;
use regex::Regex;

pub use units::{parse_distance, parse_unit};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\r\n ]+").unwrap());
static WELL_WORDS: Lazy<Regex> = Lazy::new(|| Regex::new(r"Wellbore|Well").unwrap());
static TRAILING: Lazy<Regex> = Lazy::new(|| Regex::new(r"[- ]+$").unwrap());

/// Normalise a well or wellbore name
///
/// Collapses whitespace, drops the words `Well`/`Wellbore` and strips
/// trailing dashes and spaces.
pub fn clean_name(name: &str) -> String {
    let s = WHITESPACE.replace_all(name, " ");
    let s = WELL_WORDS.replace_all(&s, "");
    let s = TRAILING.replace_all(&s, "");
    s.trim().to_string()
}
