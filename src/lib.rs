//! # qrtiny
//!
//! A small Rust library for generating the smallest QR code size (version 1,
//! 21x21 modules) into caller-owned buffers.
//!
//! `qrtiny` encodes one segment of text in numeric, alphanumeric or byte mode,
//! pads it to the data capacity of one of the four error correction levels,
//! appends a single Reed-Solomon block and draws the symbol with the mask
//! pattern the caller chooses. Larger versions, alignment patterns, mixed-mode
//! segments and automatic mask scoring are intentionally not provided.
//!
//! ## Features
//!
//! - Encode data in numeric, alphanumeric or byte mode.
//! - Support four error correction levels: Low, Medium, Quartile, High.
//! - Caller-selected mask pattern, no heap allocation in the encoder.
//! - Render QR codes as terminal text, SVG, in-memory image buffers or PNG files.
//!
//! ## Example
//!
//! ```rust
//! use qrtiny::qrcode::{Mask, QrCode, QrCodeEcc, BUFFER_LEN, SCRATCH_BUFFER_LEN, QUIET_STANDARD};
//! use qrtiny::segment::QrSegmentMode;
//! use qrtiny::helper::to_text_medium;
//!
//! let mut tempbuffer = [0u8; SCRATCH_BUFFER_LEN];
//! let mut outbuffer = [0u8; BUFFER_LEN];
//! let qr = QrCode::encode_text(
//!     "HELLO WORLD",
//!     QrSegmentMode::Alphanumeric,
//!     &mut tempbuffer,
//!     &mut outbuffer,
//!     QrCodeEcc::Medium,
//!     Mask::Pattern0,
//! ).unwrap();
//! print!("{}", to_text_medium(&qr, QUIET_STANDARD, false));
//! ```
//!
//! ## Modules
//!
//! - [`qrcode`]: Symbol generation and module queries.
//! - [`segment`]: Segment encoding for the three supported modes.
//! - [`helper`]: Utilities for rendering QR codes in various formats.

#![forbid(unsafe_code)]

pub mod bits;
pub mod ecc;
pub mod error;
pub mod format;
pub mod helper;
pub mod layout;
pub mod qrcode;
pub mod segment;

pub use error::QrError;
pub use qrcode::{Mask, QrCode, QrCodeEcc};
pub use segment::QrSegmentMode;
