//! Static translation tables between canonical exchange codes and each
//! upstream provider's own vocabulary.
//!
//! # Overview
//!
//! ```text
//!   Marketstack MIC (XNAS)       ──┐
//!   OpenFIGI exchCode (AU)       ──┤
//!   Yahoo exchange (NMS)         ──┼──> canonical code (NASDAQ, ASX, ...) ──> suffix (.NAS, .AX)
//!   Alpha Vantage region (XETRA) ──┘
//! ```
//!
//! Every table is immutable data behind a `match`.

pub mod alpha_vantage;
pub mod marketstack;
pub mod openfigi;
pub mod security_type;
pub mod suffix;
pub mod yahoo;

pub use security_type::normalize_security_type;
pub use suffix::{has_known_suffix, heuristic_suffix, suffix_for, KNOWN_SUFFIXES};
