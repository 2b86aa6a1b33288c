use serde::{Deserialize, Serialize};

use crate::core::error::AnalysisError;
use crate::core::video::frame::Frame;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeCounts {
    pub triangle: u32,
    pub rectangle: u32,
    pub circle: u32,
}

/// 形状检测结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeAnalysis {
    pub shapes_detected: u32,
    pub shape_types: ShapeCounts,
    /// 边缘像素占全图比例
    pub edge_density: f64,
}

/// 基于边缘轮廓的几何形状检测
///
/// Sobel 梯度阈值得到边缘图，对每个边缘连通域取凸包作为外轮廓，
/// 按顶点数分类：3 -> 三角形，4 -> 矩形，其余按圆度判定圆形。
pub struct ShapeAnalyzer {
    /// Sobel 梯度幅值阈值
    edge_threshold: f64,
    /// 轮廓最小面积，低于此值忽略
    min_area: f64,
    /// 圆度下限 4π·面积/周长²
    min_circularity: f64,
    /// 顶点合并容差，相对周长的系数
    simplify_ratio: f64,
}

impl ShapeAnalyzer {
    pub fn new() -> Self {
        Self {
            edge_threshold: 100.0,
            min_area: 500.0,
            min_circularity: 0.7,
            simplify_ratio: 0.02,
        }
    }

    pub fn analyze(&self, frame: &Frame) -> Result<ShapeAnalysis, AnalysisError> {
        frame.check_geometry()?;

        let w = frame.width as usize;
        let h = frame.height as usize;
        if w * h == 0 {
            return Ok(ShapeAnalysis {
                shapes_detected: 0,
                shape_types: ShapeCounts::default(),
                edge_density: 0.0,
            });
        }

        let gray = frame.to_intensity();
        let edges = Self::edge_map(&gray, w, h, self.edge_threshold);
        let edge_pixels = edges.iter().filter(|&&e| e).count();
        let edge_density = edge_pixels as f64 / (w * h) as f64;

        let mut counts = ShapeCounts::default();
        for component in Self::collect_components(&edges, w, h) {
            if component.len() < 3 {
                continue;
            }
            let points: Vec<(f64, f64)> = component
                .iter()
                .map(|&(x, y)| (x as f64, y as f64))
                .collect();
            let hull = Self::convex_hull(points);
            if hull.len() < 3 {
                continue;
            }

            let area = Self::polygon_area(&hull);
            if area <= self.min_area {
                continue;
            }
            let perimeter = Self::polygon_perimeter(&hull);
            let vertices = Self::simplify_vertices(&hull, self.simplify_ratio * perimeter);

            match vertices.len() {
                3 => counts.triangle += 1,
                4 => counts.rectangle += 1,
                _ => {
                    if perimeter > 0.0 {
                        let circularity =
                            4.0 * std::f64::consts::PI * area / (perimeter * perimeter);
                        if circularity > self.min_circularity {
                            counts.circle += 1;
                        }
                    }
                }
            }
        }

        Ok(ShapeAnalysis {
            shapes_detected: counts.triangle + counts.rectangle + counts.circle,
            shape_types: counts,
            edge_density,
        })
    }

    fn edge_map(gray: &[u8], w: usize, h: usize, threshold: f64) -> Vec<bool> {
        let mut edges = vec![false; w * h];
        if w < 3 || h < 3 {
            return edges;
        }

        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let i = y * w + x;
                let gx = (gray[i - w + 1] as i32 + 2 * gray[i + 1] as i32 + gray[i + w + 1] as i32)
                    - (gray[i - w - 1] as i32 + 2 * gray[i - 1] as i32 + gray[i + w - 1] as i32);
                let gy = (gray[i + w - 1] as i32 + 2 * gray[i + w] as i32 + gray[i + w + 1] as i32)
                    - (gray[i - w - 1] as i32 + 2 * gray[i - w] as i32 + gray[i - w + 1] as i32);
                let magnitude = ((gx * gx + gy * gy) as f64).sqrt();
                if magnitude > threshold {
                    edges[i] = true;
                }
            }
        }
        edges
    }

    /// 八连通域收集（显式栈避免深递归）
    fn collect_components(edges: &[bool], w: usize, h: usize) -> Vec<Vec<(usize, usize)>> {
        let mut visited = vec![false; w * h];
        let mut components = Vec::new();

        for start in 0..edges.len() {
            if !edges[start] || visited[start] {
                continue;
            }
            visited[start] = true;
            let mut stack = vec![start];
            let mut pixels = Vec::new();

            while let Some(idx) = stack.pop() {
                let x = idx % w;
                let y = idx / w;
                pixels.push((x, y));

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
                        if edges[nidx] && !visited[nidx] {
                            visited[nidx] = true;
                            stack.push(nidx);
                        }
                    }
                }
            }
            components.push(pixels);
        }
        components
    }

    /// Andrew 单调链凸包，共线点剔除
    fn convex_hull(mut points: Vec<(f64, f64)>) -> Vec<(f64, f64)> {
        points.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
        points.dedup();
        let n = points.len();
        if n < 3 {
            return points;
        }

        fn cross(o: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
            (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0)
        }

        let mut lower: Vec<(f64, f64)> = Vec::new();
        for &p in &points {
            while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
            {
                lower.pop();
            }
            lower.push(p);
        }

        let mut upper: Vec<(f64, f64)> = Vec::new();
        for &p in points.iter().rev() {
            while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
            {
                upper.pop();
            }
            upper.push(p);
        }

        lower.pop();
        upper.pop();
        lower.extend(upper);
        lower
    }

    fn polygon_area(hull: &[(f64, f64)]) -> f64 {
        let n = hull.len();
        if n < 3 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let (x1, y1) = hull[i];
            let (x2, y2) = hull[(i + 1) % n];
            sum += x1 * y2 - x2 * y1;
        }
        sum.abs() / 2.0
    }

    fn polygon_perimeter(hull: &[(f64, f64)]) -> f64 {
        let n = hull.len();
        if n < 2 {
            return 0.0;
        }
        let mut sum = 0.0;
        for i in 0..n {
            let (x1, y1) = hull[i];
            let (x2, y2) = hull[(i + 1) % n];
            sum += ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
        }
        sum
    }

    /// 逐个剔除偏离相邻弦不足容差的顶点，相当于多边形近似
    fn simplify_vertices(hull: &[(f64, f64)], tolerance: f64) -> Vec<(f64, f64)> {
        let mut kept: Vec<(f64, f64)> = hull.to_vec();
        let mut changed = true;

        while changed && kept.len() > 3 {
            changed = false;
            let mut i = 0;
            while i < kept.len() && kept.len() > 3 {
                let n = kept.len();
                let prev = kept[(i + n - 1) % n];
                let next = kept[(i + 1) % n];
                if Self::point_segment_distance(kept[i], prev, next) < tolerance {
                    kept.remove(i);
                    changed = true;
                } else {
                    i += 1;
                }
            }
        }
        kept
    }

    fn point_segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
        let dx = b.0 - a.0;
        let dy = b.1 - a.1;
        let len = (dx * dx + dy * dy).sqrt();
        if len == 0.0 {
            return ((p.0 - a.0).powi(2) + (p.1 - a.1).powi(2)).sqrt();
        }
        ((p.0 - a.0) * dy - (p.1 - a.1) * dx).abs() / len
    }
}

impl Default for ShapeAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
