//! Decoder trait for type-safe conversions.
//!
//! The `Decoder` trait converts from a source type `T` to a destination
//! type `D`. The destination must implement the `DecodableFrom<T>` marker
//! trait, so that only the conversions a crate explicitly declares are
//! possible.
//!
//! To add a new decodable type, implement both traits:
//!
//! ```no_run
//! use tsugite::decoder::{DecodableFrom, Decoder};
//!
//! struct Wire(Vec<u8>);
//! struct Parsed(String);
//!
//! #[derive(Debug)]
//! struct MyError;
//!
//! impl DecodableFrom<Wire> for Parsed {}
//!
//! impl Decoder<Wire, Parsed> for Wire {
//!     type Error = MyError;
//!
//!     fn decode(&self) -> Result<Parsed, Self::Error> {
//!         Ok(Parsed(String::from_utf8_lossy(&self.0).to_string()))
//!     }
//! }
//! ```

/// Decoder trait for converting from type `T` to type `D`.
///
/// Implemented by the source type `T` (usually `Self`). The destination
/// type must be marked `DecodableFrom<T>`. `T` may be unsized so that
/// byte slices can implement the trait directly.
pub trait Decoder<T: ?Sized, D: DecodableFrom<T>> {
    /// The error type returned when decoding fails.
    type Error;

    /// Decodes `self` into type `D`.
    ///
    /// # Errors
    ///
    /// Returns an error if the conversion fails. The specific error
    /// conditions depend on the implementing type.
    fn decode(&self) -> Result<D, Self::Error>;
}

/// Marker trait indicating that type `D` can be decoded from type `T`.
///
/// This trait has no methods; it exists so that the compiler rejects
/// `Decoder` implementations for conversion pairs no crate has declared.
pub trait DecodableFrom<T: ?Sized> {}
