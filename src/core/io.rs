use crate::shell::source::FastqError;
use flate2::read::MultiGzDecoder;
use gzp::deflate::{Bgzf, Mgzip};
use gzp::par::decompress::ParDecompressBuilder;
use memmap2::Mmap;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;

/// How the input bytes are stored on disk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InputKind {
    Plain,
    Gzip,
}

/// Read-only map of a plain file.
#[derive(Debug)]
pub struct MmapSource {
    mmap: Mmap,
}

impl MmapSource {
    pub fn open(path: &Path) -> Result<Self, FastqError> {
        let file = File::open(path).map_err(|e| FastqError::io(path, e))?;
        // SAFETY: read-only file mapping.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| FastqError::io(path, e))?;
        Ok(Self { mmap })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.len() == 0
    }
}

/// Whole-file payload: mapped for plain files, decompressed to an owned
/// buffer for gzip.
#[derive(Debug)]
pub enum InputBytes {
    Mapped(MmapSource),
    Owned(Vec<u8>),
}

impl InputBytes {
    pub fn bytes(&self) -> &[u8] {
        match self {
            InputBytes::Mapped(source) => source.bytes(),
            InputBytes::Owned(buf) => buf,
        }
    }
}

/// Classifies the input by extension, falling back to the gzip magic bytes
/// for files without a `.gz` suffix. Always opens the file, so a missing
/// path fails here rather than at read time.
pub fn detect_input_kind(path: &Path) -> Result<InputKind, FastqError> {
    let mut file = File::open(path).map_err(|e| FastqError::io(path, e))?;
    if let Some(ext) = path.extension().and_then(|s| s.to_str()) {
        if ext.eq_ignore_ascii_case("gz") {
            return Ok(InputKind::Gzip);
        }
    }
    let mut magic = [0u8; 2];
    let n = file.read(&mut magic).map_err(|e| FastqError::io(path, e))?;
    if n == 2 && magic == [0x1f, 0x8b] {
        Ok(InputKind::Gzip)
    } else {
        Ok(InputKind::Plain)
    }
}

#[derive(Clone, Copy, Debug)]
enum GzipVariant {
    Standard,
    Mgzip,
    Bgzf,
}

/// Inspects the first member's FEXTRA subfield to spot the block-compressed
/// gzip dialects, which support parallel decompression.
fn detect_gzip_variant(path: &Path) -> Result<GzipVariant, FastqError> {
    let mut file = File::open(path).map_err(|e| FastqError::io(path, e))?;
    let mut header = [0u8; 20];
    let n = file.read(&mut header).map_err(|e| FastqError::io(path, e))?;
    if n < 14 {
        return Ok(GzipVariant::Standard);
    }
    if header[0] != 0x1f || header[1] != 0x8b {
        return Ok(GzipVariant::Standard);
    }
    if header[3] & 4 == 0 {
        return Ok(GzipVariant::Standard);
    }
    if header[12] == b'B' && header[13] == b'C' {
        return Ok(GzipVariant::Bgzf);
    }
    if header[12] == b'I' && header[13] == b'G' {
        return Ok(GzipVariant::Mgzip);
    }
    Ok(GzipVariant::Standard)
}

pub fn open_gzip_reader(path: &Path, threads: usize) -> Result<Box<dyn Read + Send>, FastqError> {
    let variant = detect_gzip_variant(path)?;
    let file = File::open(path).map_err(|e| FastqError::io(path, e))?;
    let reader = BufReader::new(file);
    let reader: Box<dyn Read + Send> = match variant {
        GzipVariant::Bgzf if threads > 1 => Box::new(
            ParDecompressBuilder::<Bgzf>::new()
                .num_threads(threads)
                .map_err(|e| FastqError::decompress(path, io::Error::other(e)))?
                .from_reader(reader),
        ),
        GzipVariant::Mgzip if threads > 1 => Box::new(
            ParDecompressBuilder::<Mgzip>::new()
                .num_threads(threads)
                .map_err(|e| FastqError::decompress(path, io::Error::other(e)))?
                .from_reader(reader),
        ),
        GzipVariant::Standard | GzipVariant::Bgzf | GzipVariant::Mgzip => {
            Box::new(MultiGzDecoder::new(reader))
        }
    };
    Ok(reader)
}

/// Reads the entire input into memory: mmap for plain files, a fully
/// decompressed buffer for gzip.
pub fn read_all(path: &Path, kind: InputKind, threads: usize) -> Result<InputBytes, FastqError> {
    match kind {
        InputKind::Plain => Ok(InputBytes::Mapped(MmapSource::open(path)?)),
        InputKind::Gzip => {
            let mut reader = open_gzip_reader(path, threads)?;
            let mut buf = Vec::new();
            // Compressed FASTQ commonly inflates 3-4x.
            if let Ok(meta) = fs::metadata(path) {
                let hint = usize::try_from(meta.len()).unwrap_or(0).saturating_mul(3);
                buf.reserve(hint);
            }
            reader
                .read_to_end(&mut buf)
                .map_err(|e| FastqError::decompress(path, e))?;
            Ok(InputBytes::Owned(buf))
        }
    }
}
