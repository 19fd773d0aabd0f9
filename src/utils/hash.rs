use std::fs::File;
use std::io::{self, BufReader, ErrorKind, Read};
use std::path::Path;

use sha2::{Sha256, Digest as _};

use crate::constants::{HASH_BLOCK_SIZE, SHA256_HEX_LEN};
use crate::models::Digest;

/// Calculate the SHA-256 digest of a file using the default block size.
///
/// Returns `Digest::FileNotFound` instead of an error when the path does not
/// exist. Any other I/O failure is returned as an error.
pub fn calculate_sha256(path: &Path) -> io::Result<Digest> {
    calculate_sha256_with_block_size(path, HASH_BLOCK_SIZE)
}

/// Calculate the SHA-256 digest of a file, reading `block_size` bytes at a time.
///
/// Memory use is bounded by `block_size` regardless of file size.
pub fn calculate_sha256_with_block_size(path: &Path, block_size: usize) -> io::Result<Digest> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Digest::FileNotFound),
        Err(e) => return Err(e),
    };

    if !file.metadata()?.is_file() {
        return Err(io::Error::new(
            ErrorKind::InvalidInput,
            format!("{} is not a regular file", path.display()),
        ));
    }

    let mut reader = BufReader::with_capacity(block_size.max(1), file);
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; block_size.max(1)];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Digest::Sha256(format!("{:x}", hasher.finalize())))
}

/// True if `value` looks like a lowercase hex SHA-256 digest
pub fn is_sha256_hex(value: &str) -> bool {
    value.len() == SHA256_HEX_LEN
        && value.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}
