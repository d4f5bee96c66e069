//! Data appended to the end of an executable.
//!
//! Layout of a bundled installer:
//! `executable | zero padding to 4096 | section | u64 LE section length | FINGERPRINT`

use std::{
    env::current_exe,
    fs::File,
    io::{self, Read, Seek, SeekFrom, Write},
    path::Path,
};

use byteorder::{LE, ReadBytesExt, WriteBytesExt};
use log::debug;
use macros::hex_bytes;

// This is just some random data so the executable can check if it already contains data.
const FINGERPRINT: &[u8] =
    hex_bytes!("f4ac2a400195627734eb81b1cd2fe7019359dae01b7a8d40786beb164c580156");

const ALIGNMENT: u64 = 4096;

pub fn search_for_embedded_data() -> Result<Option<EmbeddedSection>, io::Error> {
    let path = current_exe()?;
    find_embedded_data(&path)
}

pub fn find_embedded_data(path: &Path) -> Result<Option<EmbeddedSection>, io::Error> {
    let mut file = File::open(path)?;
    let trailer_len = FINGERPRINT.len() as u64 + 8;
    let file_len = file.metadata()?.len();
    if file_len < trailer_len {
        return Ok(None);
    }

    file.seek(SeekFrom::End(-(FINGERPRINT.len() as i64)))?;
    let mut fprint = vec![0u8; FINGERPRINT.len()];
    file.read_exact(&mut fprint)?;

    if fprint != FINGERPRINT {
        return Ok(None);
    }

    file.seek(SeekFrom::End(-(trailer_len as i64)))?;
    let length = file.read_u64::<LE>()?;
    let end = file_len - trailer_len;
    let start = end.checked_sub(length).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Embedded data section of {length} bytes exceeds the file size"),
        )
    })?;
    debug!(
        "found embedded data section with {} bytes in {}",
        length,
        path.display()
    );

    EmbeddedSection::new(file, start, end).map(Some)
}

/// Read window over the embedded data section of a file.
pub struct EmbeddedSection {
    file: File,
    start: u64,
    end: u64,
    position: u64,
}

impl EmbeddedSection {
    fn new(mut file: File, start: u64, end: u64) -> Result<Self, io::Error> {
        file.seek(SeekFrom::Start(start))?;
        Ok(Self {
            file,
            start,
            end,
            position: start,
        })
    }

    /// Bytes left between the window start and the end of the section
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Makes the current position offset zero of the window.
    pub fn move_start_to_current(&mut self) {
        self.start = self.position;
    }
}

impl Read for EmbeddedSection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.end.saturating_sub(self.position);
        let max = remaining.min(buf.len() as u64) as usize;
        if max == 0 {
            return Ok(0);
        }
        let read = self.file.read(&mut buf[..max])?;
        self.position += read as u64;
        Ok(read)
    }
}

impl Seek for EmbeddedSection {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => self.start.checked_add(offset),
            SeekFrom::End(offset) => self.end.checked_add_signed(offset),
            SeekFrom::Current(offset) => self.position.checked_add_signed(offset),
        };
        let target = target.filter(|target| *target >= self.start).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before the start of the embedded data section",
            )
        })?;

        self.position = self.file.seek(SeekFrom::Start(target))?;
        Ok(self.position - self.start)
    }
}

/// Copies `source` to `new_executable` and opens a writer for the data section.
pub fn append_data(source: &Path, new_executable: &Path) -> Result<AppendDataWriter, io::Error> {
    std::fs::copy(source, new_executable)?;
    let mut file = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open(new_executable)?;

    let current_size = file.seek(SeekFrom::End(0))?;

    let misalignment = current_size % ALIGNMENT;
    let padding_size = if misalignment != 0 {
        ALIGNMENT - misalignment
    } else {
        0
    };

    if padding_size > 0 {
        let zeros = vec![0u8; padding_size as usize];
        file.write_all(&zeros)?;
    }

    AppendDataWriter::new(file)
}

/// Writes the data section, seeks relative to the current window start.
pub struct AppendDataWriter {
    section_start: u64,
    start: u64,
    file: File,
}

impl AppendDataWriter {
    pub fn new(mut file: File) -> Result<Self, io::Error> {
        let start = file.seek(SeekFrom::End(0))?;
        Ok(Self {
            section_start: start,
            start,
            file,
        })
    }

    /// Everything written so far becomes a header that later seeks cannot reach.
    pub fn move_start_to_current(&mut self) -> Result<(), io::Error> {
        self.start = self.file.stream_position()?;
        Ok(())
    }

    /// Writes the section length and fingerprint and syncs the file.
    pub fn finish(mut self) -> Result<File, io::Error> {
        let total_size = self.file.seek(SeekFrom::End(0))?;
        let written = total_size - self.section_start;
        debug!("finishing embedded data section with {} bytes", written);
        self.file.write_u64::<LE>(written)?;
        self.file.write_all(FINGERPRINT)?;

        self.file.sync_all()?;

        Ok(self.file)
    }
}

impl Write for AppendDataWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Seek for AppendDataWriter {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let new_pos = match pos {
            SeekFrom::Start(pos) => self.file.seek(SeekFrom::Start(pos + self.start))?,
            SeekFrom::End(pos) => {
                let end = self.file.seek(SeekFrom::End(0))?;
                let min = self.start as i64 - end as i64;
                self.file.seek(SeekFrom::End(pos.max(min)))?
            }
            SeekFrom::Current(pos) => {
                let new_pos = self.file.seek(SeekFrom::Current(pos))?;
                if new_pos < self.start {
                    self.file.seek(SeekFrom::Start(self.start))?
                } else {
                    new_pos
                }
            }
        };

        Ok(new_pos - self.start)
    }
}
