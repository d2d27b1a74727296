/// File extension for staged image bytes, picked from the magic number.
///
/// ffmpeg's image demuxer chooses its decoder (and honours `-loop`) from the
/// file name, so the staged file needs a matching extension. Unknown data is
/// staged as PNG and left for the encoder to reject.
pub fn image_extension(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "png",
        [0xFF, 0xD8, 0xFF, ..] => "jpg",
        [b'G', b'I', b'F', b'8', ..] => "gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
        [b'B', b'M', ..] => "bmp",
        _ => "png",
    }
}
