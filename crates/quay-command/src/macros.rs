/// Declare a group of commands from plain function signatures.
///
/// Each `fn` becomes a [`CommandDescriptor`](crate::CommandDescriptor). The
/// command name is the function name (lowercased) unless overridden with
/// `#[command = "..."]`. Parameters become typed parameter specs in order; a
/// parameter with `= default` is optional. Doc comments become the command
/// description. The first parameter is the [`Invocation`](crate::Invocation)
/// context and takes no type.
///
/// ```ignore
/// quay_command::command_set! {
///     pub struct MathCommands;
///
///     /// Add two integers
///     fn add(inv, a: i32, b: i32 = 0) {
///         inv.message(&format!("{a} + {b} is {}", a + b));
///     }
/// }
/// ```
#[macro_export]
macro_rules! command_set {
    (@name $func:ident $name:literal) => {
        $name
    };
    (@name $func:ident) => {
        stringify!($func)
    };
    (@doc $($doc:literal)*) => {
        concat!("" $(, " ", $doc)*)
            .split_whitespace()
            .collect::<::std::vec::Vec<_>>()
            .join(" ")
    };
    (@param $builder:ident $param:ident $ty:ty = $default:expr) => {
        $builder.optional::<$ty>(stringify!($param), $default)
    };
    (@param $builder:ident $param:ident $ty:ty) => {
        $builder.param::<$ty>(stringify!($param))
    };
    (
        $(#[$meta:meta])*
        $vis:vis struct $set:ident;
        $(
            $(#[doc = $doc:literal])*
            $(#[command = $name:literal])?
            fn $func:ident($ctx:ident $(, $param:ident : $ty:ty $(= $default:expr)?)* $(,)?) $body:block
        )*
    ) => {
        $(#[$meta])*
        $vis struct $set;

        impl $crate::CommandSet for $set {
            fn commands() -> $crate::__private::Result<::std::vec::Vec<$crate::CommandDescriptor>> {
                let mut out = ::std::vec::Vec::new();
                $(
                    let builder = $crate::CommandDescriptor::builder(
                        $crate::command_set!(@name $func $($name)?),
                    )
                    .describe($crate::command_set!(@doc $($doc)*));
                    $(
                        let builder = $crate::command_set!(@param builder $param $ty $(= $default)?);
                    )*
                    out.push(builder.build(
                        |$ctx: &mut $crate::Invocation<'_>| -> $crate::__private::Result<()> {
                            $(
                                let $param: $ty = $ctx.next_arg::<$ty>()?;
                            )*
                            $body
                            ::std::result::Result::Ok(())
                        },
                    )?);
                )*
                ::std::result::Result::Ok(out)
            }
        }
    };
}
