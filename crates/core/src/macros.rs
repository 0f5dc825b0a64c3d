// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros for reducing boilerplate.
//!
//! - [`string_enum!`] — canonical string codec (`as_str`, `parse`, `Display`)
//!   for unit enums
//! - [`builder!`] — test builder struct with Default, setters, and `build()`
//! - [`setters!`] — setter methods for production builder/config structs

/// Generate the canonical string codec for a unit enum: `as_str`, a
/// `Display` impl delegating to it, and `parse` as its exact inverse.
///
/// Lifecycle statuses, audit event types, and verdicts are persisted and
/// transported as their SCREAMING_SNAKE strings; deriving both
/// directions from one table keeps the codec from drifting.
///
/// ```ignore
/// crate::string_enum! {
///     Verdict {
///         Pass => "PASS",
///         Warn => "WARN",
///         Fail => "FAIL",
///     }
/// }
/// ```
#[macro_export]
macro_rules! string_enum {
    ($enum:ty { $( $variant:ident => $str:literal ),+ $(,)? }) => {
        impl $enum {
            /// Canonical wire/storage encoding.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }

            /// Parse the canonical encoding (inverse of [`Self::as_str`]).
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $( $str => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Generate a test builder (struct + Default + setters + build).
///
/// All generated items are gated behind `#[cfg(any(test, feature = "test-support"))]`.
///
/// Field groups (all three required, in order):
/// - `field { name: Type = default }` — always-present field; setter
///   takes `impl Into<Type>`
/// - `option { name: Type = default }` — builder field is `Option<Type>`;
///   setter wraps in `Some(v.into())`
/// - `computed { name: Type = expr }` — no builder field or setter;
///   value computed at build time
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            field {
                $( $field:ident : $field_ty:ty = $field_default:expr ),+ $(,)?
            }
            option {
                $( $opt_field:ident : $opt_ty:ty = $opt_default:expr ),* $(,)?
            }
            computed {
                $( $comp_field:ident : $comp_ty:ty = $comp_expr:expr ),* $(,)?
            }
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $( $field: $field_ty, )+
            $( $opt_field: Option<$opt_ty>, )*
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self {
                    $( $field: $field_default.into(), )+
                    $( $opt_field: $opt_default, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $(
                pub fn $field(mut self, v: impl Into<$field_ty>) -> Self {
                    self.$field = v.into();
                    self
                }
            )+

            $(
                pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                    self.$opt_field = Some(v.into());
                    self
                }
            )*

            pub fn build(self) -> $target {
                $target {
                    $( $field: self.$field, )+
                    $( $opt_field: self.$opt_field, )*
                    $( $comp_field: $comp_expr, )*
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            /// Create a builder with test defaults.
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}

/// Generate setter methods inside an existing `impl` block.
///
/// - `set { name: Type }` — setter takes `Type` directly (scalar-friendly;
///   an `Into` bound would break integer literal inference)
/// - `option { name: Type }` — setter wraps in `Some(v.into())`
#[macro_export]
macro_rules! setters {
    (
        $(set {
            $( $set_field:ident : $set_ty:ty ),* $(,)?
        })?
        $(option {
            $( $opt_field:ident : $opt_ty:ty ),* $(,)?
        })?
    ) => {
        $($(
            pub fn $set_field(mut self, v: $set_ty) -> Self {
                self.$set_field = v;
                self
            }
        )*)?

        $($(
            pub fn $opt_field(mut self, v: impl Into<$opt_ty>) -> Self {
                self.$opt_field = Some(v.into());
                self
            }
        )*)?
    };
}
