//! Macro for implementing Display and FromStr for status enums
//!
//! Status values arrive as strings from storage and from the shop and ERP
//! systems. This macro gives every closed status enumeration one canonical
//! string form and a case-insensitive parser that rejects anything else
//! with [`WooSapError::InvalidStatus`](crate::errors::WooSapError).
//!
//! # Example
//!
//! ```rust
//! use woosap_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum StockSyncStatus {
//!     Pending,
//!     Synced,
//! }
//!
//! impl_domain_status_conversions!(StockSyncStatus {
//!     Pending => "pending",
//!     Synced => "synced",
//! });
//!
//! assert_eq!("SYNCED".parse::<StockSyncStatus>().unwrap(), StockSyncStatus::Synced);
//! assert!("shipped".parse::<StockSyncStatus>().is_err());
//! ```

/// Implements Display, FromStr and `as_str` for status enums
///
/// This macro generates:
/// - `as_str`: the canonical lowercase representation
/// - Display trait: writes `as_str`
/// - FromStr trait: parses case-insensitive strings, failing with
///   `WooSapError::InvalidStatus` for unknown values
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their string
///   representations
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical string form as stored
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = $crate::errors::WooSapError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::errors::WooSapError::InvalidStatus(format!(
                        "Invalid {}: {}",
                        stringify!($enum_name),
                        s
                    ))),
                }
            }
        }
    };
}
