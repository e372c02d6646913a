//! Naming of descriptors for logs and lookups.

/// A descriptor with a debug name and a canonical identifier.
///
/// | Descriptor | `debug_name()`                          | `full_name()`            |
/// |------------|-----------------------------------------|--------------------------|
/// | class      | `App\Foo`                               | `App\Foo`                |
/// | method     | `App\Foo::create()`                     | `App\Foo::create`        |
/// | parameter  | `parameter $x of App\Foo::create()`     | `App\Foo::create()$x`    |
///
/// Methods are named after the class they were requested against.
pub trait NameHaving {
    /// Get a name to use in debug and log messages.
    ///
    /// Unique against descriptors of any kind.
    fn debug_name(&self) -> String;

    /// Get a name to use as an identifier.
    ///
    /// Unique against other classes and methods, but may clash with other
    /// members using the same `Class::member` pattern.
    fn full_name(&self) -> String;
}
