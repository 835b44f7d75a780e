//! Helper macro generating port error enums with `impl Into` constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum ExamplePortError {
            Unreachable => "backend unreachable",
            Query { message: String } => "query failed: {message}",
            Retries { attempts: u32 } => "gave up after {attempts} attempts",
            Keyed { key: String, attempts: u32 } => "{key} failed after {attempts} attempts",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(ExamplePortError::unreachable(), ExamplePortError::Unreachable);
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::query("timeout");
        assert_eq!(err.to_string(), "query failed: timeout");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExamplePortError::keyed("listing:1", 3_u32);
        assert_eq!(err.to_string(), "listing:1 failed after 3 attempts");
        assert_eq!(
            ExamplePortError::retries(2_u32).to_string(),
            "gave up after 2 attempts"
        );
    }
}
