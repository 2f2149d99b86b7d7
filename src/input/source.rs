use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use memmap2::Mmap;

use crate::input::InputError;

/// Raw bytes of a stack file: mapped in place, or inflated when the file is gzip-compressed.
pub enum StackBytes {
    Mapped(Mmap),
    Inflated(Vec<u8>),
}

impl AsRef<[u8]> for StackBytes {
    fn as_ref(&self) -> &[u8] {
        match self {
            StackBytes::Mapped(map) => &map[..],
            StackBytes::Inflated(buf) => &buf[..],
        }
    }
}

pub fn is_gz(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

pub fn read_stack_bytes(path: &Path) -> Result<StackBytes, InputError> {
    let file = File::open(path)?;
    if is_gz(path) {
        let mut buf = Vec::new();
        GzDecoder::new(file).read_to_end(&mut buf)?;
        if buf.is_empty() {
            return Err(InputError::InvalidInput(format!(
                "{} inflates to zero bytes",
                path.display()
            )));
        }
        return Ok(StackBytes::Inflated(buf));
    }
    if file.metadata()?.len() == 0 {
        return Err(InputError::InvalidInput(format!(
            "{} is empty",
            path.display()
        )));
    }
    // The file is opened read-only and not modified while the map is alive.
    let map = unsafe { Mmap::map(&file)? };
    Ok(StackBytes::Mapped(map))
}
