//! Domain types shared by the repository, service and HTTP layers.

/// Declare a fieldless enum persisted as lowercase text.
///
/// Generates `as_str`, a lenient `parse`, `Display`, `Default` and serde
/// support using the same spelling as the database column.
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
        default = $default:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $($(#[$vmeta])* #[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Database and wire spelling of the variant.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Parse the database spelling, ignoring case and surrounding whitespace.
            pub fn parse(value: &str) -> Option<Self> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl From<&str> for $name {
            /// Unknown values read back from storage fall back to the default variant.
            fn from(value: &str) -> Self {
                $name::parse(value).unwrap_or_default()
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }
    };
}

pub mod beat_plan;
pub mod call_log;
pub mod collection;
pub mod customer;
pub mod follow_up;
pub mod lead;
pub mod location;
pub mod order;
pub mod price_list;
pub mod pricing;
pub mod product;
pub mod route;
pub mod user;

text_enum! {
    /// Telecalling records attach to either a customer or a lead.
    pub enum EntityType {
        Customer => "customer",
        Lead => "lead",
    }
    default = Customer;
}
