//! # tsugite
//!
//! Core traits for the tsugite ASN.1 BER/DER codec.
//!
//! This crate defines the `Decoder` and `Encoder` traits that establish a
//! type-safe conversion pattern between the representations of an encoded
//! ASN.1 value:
//!
//! ```text
//! &[u8] → Der → UnspecifiedType / ASN1Object
//! ```
//!
//! Each step uses the `Decoder` trait to convert from one representation to
//! the next, and the `Encoder` trait to convert in the reverse direction.
//! Marker traits (`DecodableFrom` and `EncodableTo`) constrain the valid
//! conversion pairs at compile time.

#![forbid(unsafe_code)]

pub mod decoder;
pub mod encoder;
