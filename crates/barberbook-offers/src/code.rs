// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offer codes and their QR images.

use barberbook_core::BarberError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use rand::Rng;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const OFFER_CODE_LEN: usize = 8;

/// Random eight-character uppercase alphanumeric code.
///
/// Uniqueness is not checked; collisions are possible but rare.
pub fn generate_offer_code() -> String {
    generate_offer_code_with(&mut rand::thread_rng())
}

pub fn generate_offer_code_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..OFFER_CODE_LEN)
        .map(|_| CODE_CHARSET[rng.gen_range(0..CODE_CHARSET.len())] as char)
        .collect()
}

/// Render `code` as a black-on-white SVG QR (error correction H) and wrap it
/// in a base64 data URI.
pub fn render_qr_data_uri(code: &str, min_dimension: u32) -> Result<String, BarberError> {
    let qr = QrCode::with_error_correction_level(code.as_bytes(), EcLevel::H)
        .map_err(|e| BarberError::Internal(format!("failed to generate QR code: {e}")))?;
    let image = qr
        .render::<svg::Color<'_>>()
        .min_dimensions(min_dimension, min_dimension)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .quiet_zone(true)
        .build();
    Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
}
