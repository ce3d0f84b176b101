//! Encoder trait, the reverse direction of [`crate::decoder`].

/// Encoder trait for converting `self` into the encoded form `E`.
pub trait Encoder<T, E: EncodableTo<T>> {
    type Error;

    fn encode(&self) -> Result<E, Self::Error>;
}

/// Marker trait indicating that `E` is a valid encoded form of `T`.
pub trait EncodableTo<T> {}
