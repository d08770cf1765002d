//! Rendering adaptors: the pixel sink boundary plus SVG, terminal
//! ASCII and (feature-gated) PNG output.

use crate::matrix::Module;
use crate::QrCode;

/// Receiver for the pixel-resolved symbol.
///
/// `render` calls `set_pixel` once per pixel in row-major order over a
/// square image of `module_size * side` pixels on each edge. Implement
/// this to realise modules as image pixels, terminal cells or anything
/// else; the sink owns all I/O.
pub trait PixelSink {
    fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8);
}

impl QrCode {
    /// Drive a pixel sink over the symbol, `module_size` pixels per
    /// module. Dark modules are black, everything else white.
    pub fn render<S: PixelSink>(&self, module_size: u32, sink: &mut S) {
        let pixels = self.side() as u32 * module_size;
        for py in 0..pixels {
            for px in 0..pixels {
                let x = (px / module_size) as usize;
                let y = (py / module_size) as usize;
                let v = if self.module(x, y) == Module::Dark { 0 } else { 255 };
                sink.set_pixel(px, py, v, v, v);
            }
        }
    }

    /// Render as an SVG document with the standard four-module quiet
    /// zone.
    pub fn to_svg(&self, module_size: u32) -> String {
        let side = self.side();
        let quiet = 4usize;
        let total = (side + 2 * quiet) * module_size as usize;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}">"#,
            total, total, total, total
        );
        svg.push_str(&format!(
            r#"<rect width="{}" height="{}" fill="white"/>"#,
            total, total
        ));

        for y in 0..side {
            for x in 0..side {
                if self.module(x, y) == Module::Dark {
                    svg.push_str(&format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="black"/>"#,
                        (x + quiet) * module_size as usize,
                        (y + quiet) * module_size as usize,
                        module_size,
                        module_size
                    ));
                }
            }
        }

        svg.push_str("</svg>");
        svg
    }

    /// Render as terminal ASCII art, two characters per module with a
    /// two-module quiet zone.
    pub fn to_ascii(&self) -> String {
        let side = self.side();
        let quiet = 2usize;
        let width = (side + 2 * quiet) * 2;
        let mut out = String::new();

        let blank_row = " ".repeat(width) + "\n";
        for _ in 0..quiet {
            out.push_str(&blank_row);
        }
        for y in 0..side {
            out.push_str(&" ".repeat(quiet * 2));
            for x in 0..side {
                out.push_str(if self.module(x, y) == Module::Dark {
                    "\u{2588}\u{2588}"
                } else {
                    "  "
                });
            }
            out.push_str(&" ".repeat(quiet * 2));
            out.push('\n');
        }
        for _ in 0..quiet {
            out.push_str(&blank_row);
        }

        out
    }

    /// Render as a grayscale PNG with the standard four-module quiet
    /// zone. Returns the encoded file contents.
    #[cfg(feature = "png")]
    pub fn to_png(&self, module_size: u32) -> Vec<u8> {
        let side = self.side();
        let quiet = 4usize;
        let total = (side + 2 * quiet) * module_size as usize;

        let mut pixels = vec![255u8; total * total];
        for y in 0..side {
            for x in 0..side {
                if self.module(x, y) != Module::Dark {
                    continue;
                }
                let px = (x + quiet) * module_size as usize;
                let py = (y + quiet) * module_size as usize;
                for dy in 0..module_size as usize {
                    for dx in 0..module_size as usize {
                        pixels[(py + dy) * total + px + dx] = 0;
                    }
                }
            }
        }

        let mut data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut data, total as u32, total as u32);
            encoder.set_color(png::ColorType::Grayscale);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().expect("PNG header write failed");
            writer
                .write_image_data(&pixels)
                .expect("PNG data write failed");
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EcLevel;

    struct Recorder {
        expected_next: u64,
        side: u32,
        dark_pixels: usize,
    }

    impl PixelSink for Recorder {
        fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) {
            assert_eq!(
                (y as u64) * self.side as u64 + x as u64,
                self.expected_next,
                "pixels must arrive in row-major order"
            );
            self.expected_next += 1;
            assert_eq!(r, g);
            assert_eq!(g, b);
            if r == 0 {
                self.dark_pixels += 1;
            }
        }
    }

    #[test]
    fn render_visits_every_pixel_in_row_major_order() {
        let qr = QrCode::encode("PIXEL SINK", EcLevel::M).unwrap();
        let module_size = 3u32;
        let side = qr.side() as u32 * module_size;
        let mut sink = Recorder {
            expected_next: 0,
            side,
            dark_pixels: 0,
        };
        qr.render(module_size, &mut sink);
        assert_eq!(sink.expected_next, side as u64 * side as u64);

        // Every dark module contributes module_size^2 dark pixels.
        let dark_modules = (0..qr.side())
            .flat_map(|y| (0..qr.side()).map(move |x| (x, y)))
            .filter(|&(x, y)| qr.module(x, y) == Module::Dark)
            .count();
        assert_eq!(sink.dark_pixels, dark_modules * 9);
    }

    #[test]
    fn svg_output_is_well_formed() {
        let qr = QrCode::encode("TEST", EcLevel::L).unwrap();
        let svg = qr.to_svg(10);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("viewBox"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn ascii_output_has_quiet_zone() {
        let qr = QrCode::encode("TEST", EcLevel::L).unwrap();
        let ascii = qr.to_ascii();
        let lines: Vec<&str> = ascii.lines().collect();
        assert_eq!(lines.len(), qr.side() + 4);
        assert!(lines[0].chars().all(|c| c == ' '));
        assert!(ascii.contains('\u{2588}'));
    }

    #[cfg(feature = "png")]
    #[test]
    fn png_output_has_signature() {
        let qr = QrCode::encode("TEST", EcLevel::L).unwrap();
        let data = qr.to_png(4);
        assert_eq!(&data[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n']);
    }
}
