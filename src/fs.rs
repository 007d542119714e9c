//! File conversion: one [`ConversionSession`] per input file.
//!
//! A session owns both file handles, so they are closed on every exit path,
//! including early returns on a bad header or a failed write. Nothing is
//! created on disk until the input header has been validated and the file
//! is known to hold every declared row. An output path naming the input
//! file is refused. A failure or stop request while rows are being written
//! leaves the partial output in place.

use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use enough::Stop;

use crate::bmp::{BmpHeader, HEADER_LEN, output_header, pixels_present, prepare};
use crate::error::{ErrorKind, Rgb565Error};
use crate::limits::Limits;
use crate::pixel::bgr_row_to_565_be;

/// Extension given to converted files.
pub const DEFAULT_EXTENSION: &str = "565";

/// Errors from converting files on disk.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FileError {
    #[error("file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: output would overwrite the input file", .0.display())]
    SameFile(PathBuf),

    #[error("{}: {source}", path.display())]
    Convert {
        path: PathBuf,
        #[source]
        source: Rgb565Error,
    },
}

impl FileError {
    fn io(path: &Path, source: io::Error) -> Self {
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn convert(path: &Path, source: Rgb565Error) -> Self {
        FileError::Convert {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FileError::NotFound(_) => ErrorKind::NotFound,
            FileError::Io { .. } | FileError::SameFile(_) => ErrorKind::Io,
            FileError::Convert { source, .. } => source.kind(),
        }
    }
}

/// What a finished conversion produced.
#[derive(Clone, Debug)]
pub struct ConversionReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub header: BmpHeader,
    /// Header plus pixel bytes.
    pub bytes_written: u64,
}

/// Conversion of one BMP file on disk.
///
/// ```no_run
/// use std::path::Path;
/// use zen565::{ConvertRequest, Unstoppable};
///
/// let report = ConvertRequest::new(Path::new("logo.bmp")).convert(Unstoppable)?;
/// println!("{} created", report.output.display());
/// # Ok::<(), zen565::FileError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ConvertRequest<'a> {
    input: &'a Path,
    output: Option<PathBuf>,
    extension: &'a str,
    limits: Option<&'a Limits>,
}

impl<'a> ConvertRequest<'a> {
    pub fn new(input: &'a Path) -> Self {
        Self {
            input,
            output: None,
            extension: DEFAULT_EXTENSION,
            limits: None,
        }
    }

    /// Write to `output` instead of the input path with a new extension.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Extension for the derived output path (default `565`).
    pub fn with_extension(mut self, extension: &'a str) -> Self {
        self.extension = extension;
        self
    }

    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.input.with_extension(self.extension))
    }

    /// Validate the input header and create the output file.
    pub fn open(self) -> Result<ConversionSession, FileError> {
        let output = self.output_path();
        ConversionSession::open(self.input, output, self.limits)
    }

    /// Open, write every row, flush.
    pub fn convert(self, stop: impl Stop) -> Result<ConversionReport, FileError> {
        let mut session = self.open()?;
        session.run(&stop)?;
        session.finish()
    }
}

/// Per-file conversion state. Dropping it closes both files.
#[derive(Debug)]
pub struct ConversionSession {
    input_path: PathBuf,
    output_path: PathBuf,
    input: File,
    output: BufWriter<File>,
    header: BmpHeader,
    /// Next output row, counted top-down.
    row: u32,
    row_in: Vec<u8>,
    row_out: Vec<u8>,
    bytes_written: u64,
}

impl ConversionSession {
    fn open(
        input_path: &Path,
        output_path: PathBuf,
        limits: Option<&Limits>,
    ) -> Result<Self, FileError> {
        let mut input = File::open(input_path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                FileError::NotFound(input_path.to_path_buf())
            } else {
                FileError::io(input_path, e)
            }
        })?;

        if let Ok(existing) = output_path.canonicalize()
            && input_path.canonicalize().is_ok_and(|p| p == existing)
        {
            return Err(FileError::SameFile(input_path.to_path_buf()));
        }

        let mut block = Vec::with_capacity(HEADER_LEN);
        (&mut input)
            .take(HEADER_LEN as u64)
            .read_to_end(&mut block)
            .map_err(|e| FileError::io(input_path, e))?;

        let header = prepare(&block, limits).map_err(|e| FileError::convert(input_path, e))?;
        let block: [u8; HEADER_LEN] = block
            .as_slice()
            .try_into()
            .map_err(|_| FileError::convert(input_path, Rgb565Error::UnexpectedEof))?;

        let input_len = input
            .metadata()
            .map_err(|e| FileError::io(input_path, e))?
            .len();
        if !pixels_present(&header, input_len) {
            return Err(FileError::convert(input_path, Rgb565Error::UnexpectedEof));
        }

        // no rows, no row buffers
        let width = if header.abs_height() == 0 {
            0
        } else {
            header.width_px() as usize
        };
        let (Some(in_len), Some(out_len)) = (width.checked_mul(3), width.checked_mul(2)) else {
            return Err(FileError::convert(
                input_path,
                Rgb565Error::DimensionsTooLarge {
                    width: header.width_px(),
                    height: header.abs_height(),
                },
            ));
        };

        let out_file = File::create(&output_path).map_err(|e| FileError::io(&output_path, e))?;
        let mut output = BufWriter::new(out_file);
        output
            .write_all(&output_header(&block))
            .map_err(|e| FileError::io(&output_path, e))?;

        tracing::debug!(
            input = %input_path.display(),
            output = %output_path.display(),
            width = header.width,
            height = header.height,
            "conversion session opened"
        );

        Ok(Self {
            input_path: input_path.to_path_buf(),
            output_path,
            input,
            output,
            header,
            row: 0,
            row_in: vec![0u8; in_len],
            row_out: vec![0u8; out_len],
            bytes_written: HEADER_LEN as u64,
        })
    }

    /// Validated input header.
    pub fn header(&self) -> &BmpHeader {
        &self.header
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Rows still to be written.
    pub fn rows_remaining(&self) -> u32 {
        self.header.abs_height() - self.row
    }

    /// Convert the next output row. Returns `false` once all rows are done.
    pub fn step(&mut self) -> Result<bool, FileError> {
        if self.row >= self.header.abs_height() {
            return Ok(false);
        }
        let pos = self
            .header
            .row_offset(self.row)
            .ok_or_else(|| FileError::convert(&self.input_path, Rgb565Error::UnexpectedEof))?;
        self.input
            .seek(SeekFrom::Start(pos))
            .and_then(|_| self.input.read_exact(&mut self.row_in))
            .map_err(|e| FileError::io(&self.input_path, e))?;

        bgr_row_to_565_be(&self.row_in, &mut self.row_out);
        self.output
            .write_all(&self.row_out)
            .map_err(|e| FileError::io(&self.output_path, e))?;

        self.bytes_written += self.row_out.len() as u64;
        self.row += 1;
        Ok(true)
    }

    /// Convert all remaining rows.
    pub fn run(&mut self, stop: &dyn Stop) -> Result<(), FileError> {
        loop {
            if self.row % 16 == 0 {
                stop.check()
                    .map_err(|r| FileError::convert(&self.input_path, r.into()))?;
            }
            if !self.step()? {
                return Ok(());
            }
        }
    }

    /// Flush the output and close both files.
    pub fn finish(mut self) -> Result<ConversionReport, FileError> {
        self.output
            .flush()
            .map_err(|e| FileError::io(&self.output_path, e))?;
        tracing::info!(
            input = %self.input_path.display(),
            output = %self.output_path.display(),
            bytes = self.bytes_written,
            "converted"
        );
        Ok(ConversionReport {
            input: self.input_path,
            output: self.output_path,
            header: self.header,
            bytes_written: self.bytes_written,
        })
    }
}

/// `*.bmp` files directly inside `dir` (extension matched case-insensitively), sorted.
pub fn find_bmp_files(dir: &Path) -> Result<Vec<PathBuf>, FileError> {
    let entries = std::fs::read_dir(dir).map_err(|e| FileError::io(dir, e))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FileError::io(dir, e))?;
        let path = entry.path();
        let is_bmp = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("bmp"));
        if is_bmp && path.is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Convert each file in turn. A failure is logged and does not stop the
/// rest of the batch; results come back in input order.
pub fn convert_batch(
    paths: &[PathBuf],
    limits: Option<&Limits>,
    stop: impl Stop,
) -> Vec<Result<ConversionReport, FileError>> {
    paths
        .iter()
        .map(|path| {
            let mut request = ConvertRequest::new(path);
            if let Some(limits) = limits {
                request = request.with_limits(limits);
            }
            let result = request.open().and_then(|mut session| {
                session.run(&stop)?;
                session.finish()
            });
            if let Err(err) = &result {
                tracing::warn!(input = %path.display(), error = %err, "conversion failed");
            }
            result
        })
        .collect()
}
