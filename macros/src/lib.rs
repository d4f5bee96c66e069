use proc_macro::TokenStream;
use quote::quote;
use syn::{LitStr, parse_macro_input};

/// Decode a hex string into bytes, two digits per byte
fn decode_hex(hex: &str) -> Result<Vec<u8>, String> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("Not a hex string: {hex:?}"));
    }
    if hex.len() % 2 != 0 {
        return Err(format!("Odd number of hex digits: {}", hex.len()));
    }

    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|err| err.to_string()))
        .collect()
}

/// Turns a hex string literal into a `&[u8; N]` at compile time.
///
/// ```ignore
/// const MARKER: &[u8] = macros::hex_bytes!("f4ac2a40");
/// ```
#[proc_macro]
pub fn hex_bytes(input: TokenStream) -> TokenStream {
    let literal = parse_macro_input!(input as LitStr);

    let bytes = match decode_hex(&literal.value()) {
        Ok(bytes) => bytes,
        Err(message) => {
            return syn::Error::new(literal.span(), message)
                .to_compile_error()
                .into();
        }
    };

    let expanded = quote! {
        &[#(#bytes),*]
    };

    TokenStream::from(expanded)
}
