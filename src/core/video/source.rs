use serde::{Deserialize, Serialize};

use super::frame::Frame;

/// 视频源抽象：顺序读帧 + 基本元信息。
/// 解码器（ffmpeg、平台原生层等）在宿主侧实现该 trait。
pub trait VideoSource: Send {
    /// 源是否可读。打不开的源返回 false，下游按"无帧"降级处理
    fn is_open(&self) -> bool;

    fn frame_count(&self) -> u64;

    fn fps(&self) -> f64;

    fn dimensions(&self) -> (u32, u32);

    /// 读取下一帧；None 表示流结束或源已关闭
    fn read_next_frame(&mut self) -> Option<Frame>;
}

/// 视频源元信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    pub frame_count: u64,
    pub fps: f64,
    pub width: u32,
    pub height: u32,
    pub duration_seconds: f64,
}

impl VideoInfo {
    pub fn probe(source: &dyn VideoSource) -> Self {
        let (width, height) = source.dimensions();
        let fps = source.fps();
        let frame_count = source.frame_count();
        // fps 为 0 时时长记 0，避免除零
        let duration_seconds = if fps > 0.0 {
            frame_count as f64 / fps
        } else {
            0.0
        };
        Self {
            frame_count,
            fps,
            width,
            height,
            duration_seconds,
        }
    }
}

/// 内存帧序列源，用于测试与离线批处理
pub struct FrameSequenceSource {
    frames: Vec<Frame>,
    cursor: usize,
    fps: f64,
    dimensions: (u32, u32),
    open: bool,
}

impl FrameSequenceSource {
    pub fn new(frames: Vec<Frame>, fps: f64) -> Self {
        let dimensions = frames
            .first()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0));
        Self {
            frames,
            cursor: 0,
            fps,
            dimensions,
            open: true,
        }
    }

    /// 模拟打不开的源
    pub fn unopenable() -> Self {
        Self {
            frames: Vec::new(),
            cursor: 0,
            fps: 0.0,
            dimensions: (0, 0),
            open: false,
        }
    }

    /// 提前关闭，后续读帧返回 None
    pub fn close(&mut self) {
        self.open = false;
    }
}

impl VideoSource for FrameSequenceSource {
    fn is_open(&self) -> bool {
        self.open
    }

    fn frame_count(&self) -> u64 {
        self.frames.len() as u64
    }

    fn fps(&self) -> f64 {
        self.fps
    }

    fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    fn read_next_frame(&mut self) -> Option<Frame> {
        if !self.open {
            return None;
        }
        let frame = self.frames.get(self.cursor).cloned();
        if frame.is_some() {
            self.cursor += 1;
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_frame(width: u32, height: u32, fill: u8, frame_index: u64) -> Frame {
        let data = vec![fill; (width * height * 4) as usize];
        Frame::new(width, height, data, frame_index)
    }

    #[test]
    fn test_sequence_source_reads_in_order() {
        let frames = (0..5)
            .map(|i| create_test_frame(16, 16, (i * 40) as u8, i))
            .collect();
        let mut source = FrameSequenceSource::new(frames, 30.0);

        assert!(source.is_open());
        assert_eq!(source.frame_count(), 5);
        assert_eq!(source.dimensions(), (16, 16));

        for i in 0..5 {
            let frame = source.read_next_frame().expect("frame should exist");
            assert_eq!(frame.frame_index, i);
        }
        assert!(source.read_next_frame().is_none());
    }

    #[test]
    fn test_unopenable_source() {
        let mut source = FrameSequenceSource::unopenable();
        assert!(!source.is_open());
        assert!(source.read_next_frame().is_none());
        assert_eq!(source.frame_count(), 0);
    }

    #[test]
    fn test_close_stops_reading() {
        let frames = (0..5).map(|i| create_test_frame(8, 8, 128, i)).collect();
        let mut source = FrameSequenceSource::new(frames, 30.0);

        assert!(source.read_next_frame().is_some());
        source.close();
        assert!(source.read_next_frame().is_none());
    }

    #[test]
    fn test_probe_info() {
        let frames = (0..60).map(|i| create_test_frame(32, 24, 0, i)).collect();
        let source = FrameSequenceSource::new(frames, 30.0);

        let info = VideoInfo::probe(&source);
        assert_eq!(info.frame_count, 60);
        assert_eq!(info.width, 32);
        assert_eq!(info.height, 24);
        assert!((info.duration_seconds - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_probe_zero_fps() {
        let frames = vec![create_test_frame(8, 8, 0, 0)];
        let source = FrameSequenceSource::new(frames, 0.0);

        let info = VideoInfo::probe(&source);
        assert_eq!(info.duration_seconds, 0.0);
    }
}
