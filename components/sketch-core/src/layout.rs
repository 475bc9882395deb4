//! Text layout and the screens of the display sketches.
//!
//! Everything renders into any [`DrawTarget`] with [`BinaryColor`] pixels; the
//! sketches hand in the SSD1306 frame buffer and flush it afterwards. Each
//! screen clears the whole frame before drawing.

use core::fmt::Write;

use embedded_graphics::{
    mono_font::{
        MonoFont, MonoTextStyle,
        ascii::{FONT_7X13_BOLD, FONT_8X13, FONT_10X20},
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text, renderer::TextRenderer},
};
use heapless::String;

use crate::config::{GREETING_GAP, LINE_GAP};
use crate::convert::ThicknessReading;

/// Longest line is "Thick : 14 mm" or a voltage with a few digits, well below this.
pub const LINE_CAPACITY: usize = 24;

pub type Line = String<LINE_CAPACITY>;

pub const VOLTMETER_FONT: &MonoFont<'static> = &FONT_10X20;
pub const THICKNESS_FONT: &MonoFont<'static> = &FONT_7X13_BOLD;
pub const GREETING_FONT: &MonoFont<'static> = &FONT_8X13;

pub const THICKNESS_HEADER: &str = "OpenTHC Alpha";

/// Left edge that centers `text_width` in `area_width`, rounding down like a
/// floor division (negative when the text is wider than the area).
pub fn centered(area: u32, extent: u32) -> i32 {
    (area as i32 - extent as i32).div_euclid(2)
}

/// Top edges of lines stacked from `top`, each `line_height` tall and `gap` apart.
pub fn stacked<const N: usize>(top: i32, line_height: u32, gap: i32) -> [i32; N] {
    let mut positions = [0; N];
    let mut y = top;
    for position in positions.iter_mut() {
        *position = y;
        y += line_height as i32 + gap;
    }
    positions
}

/// Two lines around the horizontal middle, the second starting at the middle.
pub fn greeting_rows(area_height: u32, line_height: u32, gap: i32) -> [i32; 2] {
    let first = area_height as i32 / 2 - line_height as i32 - gap;
    stacked(first, line_height, gap)
}

pub fn text_width(text: &str, style: &MonoTextStyle<'_, BinaryColor>) -> u32 {
    style.measure_string(text, Point::zero(), Baseline::Top).bounding_box.size.width
}

/// Draw `text` horizontally centered with its top edge at `y`.
pub fn draw_centered<D>(target: &mut D, text: &str, y: i32, style: &MonoTextStyle<'_, BinaryColor>) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let area = target.bounding_box();
    let x = area.top_left.x + centered(area.size.width, text_width(text, style));
    Text::with_baseline(text, Point::new(x, area.top_left.y + y), *style, Baseline::Top).draw(target)?;
    Ok(())
}

pub fn voltage_line(voltage: f32) -> Line {
    let mut line = Line::new();
    let written = write!(line, "{:.2} V", voltage);
    debug_assert!(written.is_ok(), "voltage line exceeds {} bytes", LINE_CAPACITY);
    line
}

pub fn thickness_line(thickness_mm: u8) -> Line {
    let mut line = Line::new();
    let written = write!(line, "Thick : {} mm", thickness_mm);
    debug_assert!(written.is_ok(), "thickness line exceeds {} bytes", LINE_CAPACITY);
    line
}

fn fixed_line(text: &str) -> Line {
    let mut line = Line::new();
    let pushed = line.push_str(text);
    debug_assert!(pushed.is_ok(), "{} exceeds {} bytes", text, LINE_CAPACITY);
    line
}

/// Header, thickness, level label and voltage, top to bottom.
pub fn thickness_lines(reading: &ThicknessReading) -> [Line; 4] {
    let header = fixed_line(THICKNESS_HEADER);
    let level = fixed_line(reading.level().label());
    [header, thickness_line(reading.thickness_mm), level, voltage_line(reading.voltage)]
}

/// The voltage centered in both directions.
pub fn render_voltmeter<D>(target: &mut D, voltage: f32) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(VOLTMETER_FONT, BinaryColor::On);
    let line = voltage_line(voltage);
    target.clear(BinaryColor::Off)?;
    let height = target.bounding_box().size.height;
    let y = centered(height, VOLTMETER_FONT.character_size.height);
    draw_centered(target, &line, y, &style)
}

pub fn render_thickness<D>(target: &mut D, reading: &ThicknessReading) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(THICKNESS_FONT, BinaryColor::On);
    let lines = thickness_lines(reading);
    let rows: [i32; 4] = stacked(0, THICKNESS_FONT.character_size.height, LINE_GAP);
    target.clear(BinaryColor::Off)?;
    for (line, y) in lines.iter().zip(rows) {
        draw_centered(target, line, y, &style)?;
    }
    Ok(())
}

pub fn render_greeting<D>(target: &mut D, first: &str, second: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(GREETING_FONT, BinaryColor::On);
    let height = target.bounding_box().size.height;
    let [first_y, second_y] = greeting_rows(height, GREETING_FONT.character_size.height, GREETING_GAP);
    target.clear(BinaryColor::Off)?;
    draw_centered(target, first, first_y, &style)?;
    draw_centered(target, second, second_y, &style)
}

#[cfg(test)]
pub mod tests {
    use core::convert::Infallible;

    use super::*;

    const W: usize = 128;
    const H: usize = 64;

    /// 128x64 frame buffer standing in for the display.
    pub struct Frame {
        pixels: [[bool; W]; H],
    }

    impl Frame {
        pub fn new() -> Self {
            Frame { pixels: [[false; W]; H] }
        }

        /// (min x, min y, max x, max y) of all lit pixels.
        pub fn lit_bounds(&self) -> Option<(usize, usize, usize, usize)> {
            let mut bounds: Option<(usize, usize, usize, usize)> = None;
            for (y, row) in self.pixels.iter().enumerate() {
                for (x, lit) in row.iter().enumerate() {
                    if *lit {
                        bounds = Some(match bounds {
                            None => (x, y, x, y),
                            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                        });
                    }
                }
            }
            bounds
        }

        pub fn row_is_lit(&self, rows: core::ops::Range<usize>) -> bool {
            rows.into_iter().any(|y| self.pixels[y].iter().any(|lit| *lit))
        }
    }

    impl OriginDimensions for Frame {
        fn size(&self) -> Size {
            Size::new(W as u32, H as u32)
        }
    }

    impl DrawTarget for Frame {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if (0..W as i32).contains(&point.x) && (0..H as i32).contains(&point.y) {
                    self.pixels[point.y as usize][point.x as usize] = color.is_on();
                }
            }
            Ok(())
        }
    }

    #[test]
    fn centering_floors() {
        assert_eq!(centered(128, 60), 34);
        assert_eq!(centered(128, 61), 33);
        assert_eq!(centered(64, 20), 22);
        assert_eq!(centered(128, 131), -2);
    }

    #[test]
    fn stacked_rows() {
        let rows: [i32; 4] = stacked(0, 13, 4);
        assert_eq!(rows, [0, 17, 34, 51]);
        assert_eq!(greeting_rows(64, 8, 5), [19, 32]);
        assert_eq!(greeting_rows(64, 13, 5), [14, 32]);
    }

    #[test]
    fn text_lines() {
        assert_eq!(voltage_line(1.2172).as_str(), "1.22 V");
        assert_eq!(voltage_line(0.0).as_str(), "0.00 V");
        assert_eq!(thickness_line(7).as_str(), "Thick : 7 mm");

        let lines = thickness_lines(&ThicknessReading {
            voltage: 0.5,
            thickness_mm: 14,
        });
        let lines: Vec<&str> = lines.iter().map(|line| line.as_str()).collect();
        assert_eq!(lines, vec!["OpenTHC Alpha", "Thick : 14 mm", "Up", "0.50 V"]);
    }

    #[test]
    fn widest_values_fit_a_line() {
        assert_eq!(voltage_line(-6.144).as_str(), "-6.14 V");
        assert_eq!(voltage_line(-1234.5).as_str(), "-1234.50 V");
        assert_eq!(thickness_line(u8::MAX).as_str(), "Thick : 255 mm");
        for label in [THICKNESS_HEADER, "Level ok"] {
            assert_eq!(fixed_line(label).as_str(), label);
        }
    }

    #[test]
    fn text_width_of_fonts() {
        let style = MonoTextStyle::new(VOLTMETER_FONT, BinaryColor::On);
        assert_eq!(text_width("1.22 V", &style), 60);
        let style = MonoTextStyle::new(GREETING_FONT, BinaryColor::On);
        assert_eq!(text_width("Hello", &style), 40);
    }

    #[test]
    fn voltmeter_is_centered() {
        let mut frame = Frame::new();
        render_voltmeter(&mut frame, 1.2172).unwrap();
        let (x0, y0, x1, y1) = frame.lit_bounds().unwrap();
        // glyphs stay inside the 60x20 text box at (34, 22)
        assert!(x0 >= 34 && x1 < 94, "x {}..{}", x0, x1);
        assert!(y0 >= 22 && y1 < 42, "y {}..{}", y0, y1);
    }

    #[test]
    fn render_clears_previous_frame() {
        let mut frame = Frame::new();
        render_greeting(&mut frame, "Hello", "World").unwrap();
        assert!(frame.row_is_lit(14..27));
        render_voltmeter(&mut frame, 0.0).unwrap();
        assert!(!frame.row_is_lit(0..22));
        assert!(!frame.row_is_lit(42..64));
    }

    #[test]
    fn thickness_fills_four_rows() {
        let mut frame = Frame::new();
        render_thickness(
            &mut frame,
            &ThicknessReading {
                voltage: 0.0,
                thickness_mm: 1,
            },
        )
        .unwrap();
        for top in [0, 17, 34, 51] {
            assert!(frame.row_is_lit(top..top + 13), "row at {} is empty", top);
        }
    }

    #[test]
    fn greeting_is_centered() {
        let mut frame = Frame::new();
        render_greeting(&mut frame, "Hello", "Hello").unwrap();
        let (x0, y0, x1, y1) = frame.lit_bounds().unwrap();
        assert!(x0 >= 44 && x1 < 84, "x {}..{}", x0, x1);
        assert!(y0 >= 14 && y1 < 45, "y {}..{}", y0, y1);
        assert!(!frame.row_is_lit(27..32));
    }
}
