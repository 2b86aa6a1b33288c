use serde::{Deserialize, Serialize};

use crate::core::error::AnalysisError;
use crate::core::video::frame::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// 文字检测结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub has_text: bool,
    /// 全部候选区域数（未截断）
    pub region_count: u32,
    /// 最多保留前 5 个候选框
    pub regions: Vec<TextRegion>,
}

/// 文字可能性检测
///
/// 字幕/标题的笔画在水平方向密集：先按亮度二值化，
/// 再用宽扁核做闭运算把水平笔画连成条带，
/// 最后按外接框的长宽比和尺寸筛选。
pub struct TextAnalyzer {
    /// 亮度二值化阈值（检测亮色文字）
    brightness_threshold: u8,
    /// 闭运算核宽（水平方向连接距离）
    kernel_width: usize,
    /// 闭运算核高
    kernel_height: usize,
    min_region_width: u32,
    min_region_height: u32,
    /// 长宽比开区间 (min, max)
    min_aspect: f64,
    max_aspect: f64,
    max_regions: usize,
}

impl TextAnalyzer {
    pub fn new() -> Self {
        Self {
            brightness_threshold: 180,
            kernel_width: 18,
            kernel_height: 2,
            min_region_width: 50,
            min_region_height: 10,
            min_aspect: 2.0,
            max_aspect: 10.0,
            max_regions: 5,
        }
    }

    pub fn analyze(&self, frame: &Frame) -> Result<TextAnalysis, AnalysisError> {
        frame.check_geometry()?;

        let w = frame.width as usize;
        let h = frame.height as usize;
        if w * h == 0 {
            return Ok(TextAnalysis {
                has_text: false,
                region_count: 0,
                regions: Vec::new(),
            });
        }

        let gray = frame.to_intensity();
        let mask: Vec<bool> = gray.iter().map(|&v| v > self.brightness_threshold).collect();

        let hw = self.kernel_width / 2;
        let hh = self.kernel_height / 2;
        // 闭运算 = 先膨胀后腐蚀，矩形核按行列两个方向分离
        let dilated = Self::dilate_cols(&Self::dilate_rows(&mask, w, h, hw), w, h, hh);
        let closed = Self::erode_cols(&Self::erode_rows(&dilated, w, h, hw), w, h, hh);

        let mut region_count = 0u32;
        let mut regions = Vec::new();
        for bbox in Self::component_boxes(&closed, w, h) {
            let (bw, bh) = (bbox.width, bbox.height);
            if bh == 0 {
                continue;
            }
            let aspect = bw as f64 / bh as f64;
            if aspect > self.min_aspect
                && aspect < self.max_aspect
                && bw > self.min_region_width
                && bh > self.min_region_height
            {
                region_count += 1;
                if regions.len() < self.max_regions {
                    regions.push(bbox);
                }
            }
        }

        Ok(TextAnalysis {
            has_text: region_count > 0,
            region_count,
            regions,
        })
    }

    fn dilate_rows(mask: &[bool], w: usize, h: usize, hw: usize) -> Vec<bool> {
        let mut out = vec![false; w * h];
        for y in 0..h {
            let row = y * w;
            for x in 0..w {
                let x0 = x.saturating_sub(hw);
                let x1 = (x + hw).min(w - 1);
                out[row + x] = (x0..=x1).any(|xx| mask[row + xx]);
            }
        }
        out
    }

    fn dilate_cols(mask: &[bool], w: usize, h: usize, hh: usize) -> Vec<bool> {
        let mut out = vec![false; w * h];
        for y in 0..h {
            let y0 = y.saturating_sub(hh);
            let y1 = (y + hh).min(h - 1);
            for x in 0..w {
                out[y * w + x] = (y0..=y1).any(|yy| mask[yy * w + x]);
            }
        }
        out
    }

    fn erode_rows(mask: &[bool], w: usize, h: usize, hw: usize) -> Vec<bool> {
        let mut out = vec![false; w * h];
        for y in 0..h {
            let row = y * w;
            for x in 0..w {
                let x0 = x.saturating_sub(hw);
                let x1 = (x + hw).min(w - 1);
                out[row + x] = (x0..=x1).all(|xx| mask[row + xx]);
            }
        }
        out
    }

    fn erode_cols(mask: &[bool], w: usize, h: usize, hh: usize) -> Vec<bool> {
        let mut out = vec![false; w * h];
        for y in 0..h {
            let y0 = y.saturating_sub(hh);
            let y1 = (y + hh).min(h - 1);
            for x in 0..w {
                out[y * w + x] = (y0..=y1).all(|yy| mask[yy * w + x]);
            }
        }
        out
    }

    /// 八连通域外接框，按扫描顺序产出
    fn component_boxes(mask: &[bool], w: usize, h: usize) -> Vec<TextRegion> {
        let mut visited = vec![false; w * h];
        let mut boxes = Vec::new();

        for start in 0..mask.len() {
            if !mask[start] || visited[start] {
                continue;
            }
            visited[start] = true;
            let mut stack = vec![start];
            let (mut min_x, mut max_x) = (start % w, start % w);
            let (mut min_y, mut max_y) = (start / w, start / w);

            while let Some(idx) = stack.pop() {
                let x = idx % w;
                let y = idx / w;
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);

                for dy in -1i64..=1 {
                    for dx in -1i64..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = x as i64 + dx;
                        let ny = y as i64 + dy;
                        if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                            continue;
                        }
                        let nidx = ny as usize * w + nx as usize;
                        if mask[nidx] && !visited[nidx] {
                            visited[nidx] = true;
                            stack.push(nidx);
                        }
                    }
                }
            }

            boxes.push(TextRegion {
                x: min_x as u32,
                y: min_y as u32,
                width: (max_x - min_x + 1) as u32,
                height: (max_y - min_y + 1) as u32,
            });
        }
        boxes
    }
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&[20, 20, 20, 255]);
        }
        Frame::new(width, height, data, 0)
    }

    fn paint_bright_rect(frame: &mut Frame, x0: u32, y0: u32, w: u32, h: u32) {
        for y in y0..(y0 + h) {
            for x in x0..(x0 + w) {
                let idx = ((y * frame.width + x) * 4) as usize;
                frame.data[idx] = 230;
                frame.data[idx + 1] = 230;
                frame.data[idx + 2] = 230;
            }
        }
    }

    #[test]
    fn test_dark_frame_no_text() {
        let analyzer = TextAnalyzer::new();
        let frame = dark_frame(160, 120);

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!(!result.has_text);
        assert_eq!(result.region_count, 0);
    }

    #[test]
    fn test_uniform_bright_frame_not_text() {
        // 整帧全亮形成一个接近正方形的大区域，长宽比不满足文字条件
        let analyzer = TextAnalyzer::new();
        let mut frame = dark_frame(160, 120);
        paint_bright_rect(&mut frame, 0, 0, 160, 120);

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!(!result.has_text);
    }

    #[test]
    fn test_dashed_bright_bar_merged_into_text_region() {
        let analyzer = TextAnalyzer::new();
        let mut frame = dark_frame(320, 160);
        // 模拟一行字：亮段 14px、间隔 4px，总长 140，高 16
        let mut x = 100;
        while x < 240 {
            let seg = 14.min(240 - x);
            paint_bright_rect(&mut frame, x, 100, seg, 16);
            x += 18;
        }

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!(result.has_text);
        assert_eq!(result.region_count, 1);

        let region = &result.regions[0];
        assert_eq!(region.x, 100);
        assert_eq!(region.y, 100);
        assert_eq!(region.width, 140);
        assert_eq!(region.height, 16);
    }

    #[test]
    fn test_square_block_rejected_by_aspect() {
        let analyzer = TextAnalyzer::new();
        let mut frame = dark_frame(200, 200);
        paint_bright_rect(&mut frame, 50, 50, 60, 60);

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!(!result.has_text);
    }

    #[test]
    fn test_narrow_bar_rejected_by_width() {
        let analyzer = TextAnalyzer::new();
        let mut frame = dark_frame(200, 100);
        // 40x12：长宽比合格但宽度不足 50
        paint_bright_rect(&mut frame, 20, 40, 40, 12);

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!(!result.has_text);
    }

    #[test]
    fn test_regions_capped_at_five() {
        let analyzer = TextAnalyzer::new();
        let mut frame = dark_frame(160, 256);
        // 七行亮条，行距足够大避免闭运算并带
        for i in 0..7u32 {
            paint_bright_rect(&mut frame, 20, 20 + i * 18, 100, 12);
        }

        let result = analyzer.analyze(&frame).expect("analysis should work");
        assert!(result.has_text);
        assert_eq!(result.region_count, 7);
        assert_eq!(result.regions.len(), 5);
        // 扫描顺序：最上面的条带在前
        assert_eq!(result.regions[0].y, 20);
    }

    #[test]
    fn test_bad_geometry_rejected() {
        let analyzer = TextAnalyzer::new();
        let frame = Frame::new(64, 64, vec![0u8; 3], 0);
        assert!(analyzer.analyze(&frame).is_err());
    }
}
