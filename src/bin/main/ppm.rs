//! Binary PPM frame dumps, one numbered file per repaint.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use argbframe::Frame;

pub struct FrameDumper {
    dir: PathBuf,
    next: usize,
}

impl FrameDumper {
    pub fn new(dir: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, next: 0 })
    }

    /// Writes the frame as `frame_NNNN.ppm`, dropping the alpha channel.
    pub fn dump(&mut self, frame: &Frame<'_>) -> io::Result<PathBuf> {
        let path = self.dir.join(format!("frame_{:04}.ppm", self.next));
        self.next += 1;

        let file = File::create(&path)?;
        let mut out = BufWriter::new(file);
        write!(out, "P6\n{} {}\n255\n", frame.width(), frame.height())?;
        for y in 0..frame.height() {
            if let Some(row) = frame.row(y) {
                for argb in row.iter().take(frame.width()) {
                    let rgb = [(argb >> 16) as u8, (argb >> 8) as u8, *argb as u8];
                    out.write_all(&rgb)?;
                }
            }
        }
        out.flush()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dumps_are_numbered_and_carry_the_pixel_bytes() {
        let dir = std::env::temp_dir().join("bootcon-ppm-test");
        let _ = fs::remove_dir_all(&dir);
        let mut dumper = FrameDumper::new(dir.clone()).unwrap();

        let mut px = vec![0xFF11_2233u32; 2 * 2];
        let frame = Frame::new(&mut px, 2, 2, 2).unwrap();
        let first = dumper.dump(&frame).unwrap();
        let second = dumper.dump(&frame).unwrap();

        assert!(first.ends_with("frame_0000.ppm"));
        assert!(second.ends_with("frame_0001.ppm"));
        let bytes = fs::read(&first).unwrap();
        assert_eq!(&bytes[..9], b"P6\n2 2\n25");
        assert_eq!(&bytes[bytes.len() - 3..], [0x11, 0x22, 0x33]);
        let _ = fs::remove_dir_all(&dir);
    }
}
