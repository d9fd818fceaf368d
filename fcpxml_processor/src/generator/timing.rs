//! # Motion 生成器 - 时间换算
//!
//! Motion 的所有时间都以固定时基 [`TIME_SCALE`] 的整数 tick 表示，
//! 写出为四元组 `"<ticks> 30000 1 0"`。

use motion_core::ConvertError;

/// 每秒的 tick 数。
pub const TIME_SCALE: i64 = 30_000;

/// 帧数取整时容忍的浮点误差（以帧为单位）。
const FRAME_EPSILON: f64 = 1e-9;

/// 秒 -> tick，四舍五入。
pub(super) fn seconds_to_ticks(seconds: f64) -> i64 {
    (seconds * TIME_SCALE as f64).round() as i64
}

/// 格式化为 Motion 的时间四元组。
pub(super) fn format_time(ticks: i64) -> String {
    format!("{ticks} {TIME_SCALE} 1 0")
}

/// 由工程帧率决定的帧栅格。
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct FrameGrid {
    ticks_per_frame: f64,
}

impl FrameGrid {
    pub(super) fn new(frame_rate: f64) -> Result<Self, ConvertError> {
        if !(frame_rate.is_finite() && frame_rate > 0.0) {
            return Err(ConvertError::Internal(format!("无效的帧率: {frame_rate}")));
        }
        Ok(Self {
            ticks_per_frame: TIME_SCALE as f64 / frame_rate,
        })
    }

    pub(super) const fn ticks_per_frame(self) -> f64 {
        self.ticks_per_frame
    }

    /// 覆盖给定时长所需的帧数。时长为 0 时为 0 帧。
    pub(super) fn frame_count(self, duration_seconds: f64) -> i64 {
        let raw_ticks = duration_seconds * TIME_SCALE as f64;
        (raw_ticks / self.ticks_per_frame - FRAME_EPSILON).ceil() as i64
    }

    /// 节点本地时间（tick）处的源帧编号，从 1 开始。
    pub(super) fn frame_at(self, local_ticks: i64) -> i64 {
        (local_ticks as f64 / self.ticks_per_frame + FRAME_EPSILON).floor() as i64 + 1
    }
}

/// 片段在主时间线上的入点和出点（tick）。
///
/// 时长先按帧栅格向上取整，出点是最后一帧的起点：
/// `out = in + frameCount * ticksPerFrame - ticksPerFrame`。
/// 零时长的片段因此得到 `out = in - ticksPerFrame`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ClipTiming {
    pub(super) in_ticks: i64,
    pub(super) out_ticks: i64,
}

impl ClipTiming {
    pub(super) fn new(offset_seconds: f64, duration_seconds: f64, grid: FrameGrid) -> Self {
        let in_ticks = seconds_to_ticks(offset_seconds);
        let frames = grid.frame_count(duration_seconds);
        let last_frame_start = ((frames - 1) as f64 * grid.ticks_per_frame()).round() as i64;
        Self {
            in_ticks,
            out_ticks: in_ticks + last_frame_start,
        }
    }
}

/// 两个关键帧的重定时曲线：节点本地时间 -> 源帧编号。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RetimeCurve {
    pub(super) start_local: i64,
    pub(super) start_frame: i64,
    pub(super) end_local: i64,
    pub(super) end_frame: i64,
}

impl RetimeCurve {
    pub(super) fn new(timing: ClipTiming, node_offset: i64, grid: FrameGrid) -> Self {
        let start_local = timing.in_ticks - node_offset;
        let end_local = timing.out_ticks - node_offset;
        Self {
            start_local,
            start_frame: grid.frame_at(start_local),
            end_local,
            end_frame: grid.frame_at(end_local),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0 30000 1 0");
        assert_eq!(format_time(-108_000_000), "-108000000 30000 1 0");
        assert_eq!(format_time(seconds_to_ticks(1001.0 / 30000.0)), "1001 30000 1 0");
    }

    #[test]
    fn test_frame_quantization_rounds_up() {
        let grid = FrameGrid::new(30.0).unwrap();
        assert!((grid.ticks_per_frame() - 1000.0).abs() < 1e-9);

        let timing = ClipTiming::new(0.0, 1.0005, grid);
        assert_eq!(grid.frame_count(1.0005), 31);
        assert_eq!(timing.out_ticks - timing.in_ticks, 30_000);

        let exact = ClipTiming::new(2.0, 2.0, grid);
        assert_eq!(exact.in_ticks, 60_000);
        assert_eq!(exact.out_ticks, 60_000 + 59_000);
    }

    #[test]
    fn test_zero_duration_ends_one_frame_early() {
        let grid = FrameGrid::new(30.0).unwrap();
        assert_eq!(grid.frame_count(0.0), 0);
        let timing = ClipTiming::new(1.0, 0.0, grid);
        assert_eq!(timing.in_ticks, 30_000);
        assert_eq!(timing.out_ticks, timing.in_ticks - 1000);
    }

    #[test]
    fn test_ntsc_grid() {
        let grid = FrameGrid::new(30000.0 / 1001.0).unwrap();
        assert!((grid.ticks_per_frame() - 1001.0).abs() < 1e-6);
        // 10 帧的时长不应因浮点误差被算成 11 帧
        assert_eq!(grid.frame_count(10.0 * 1001.0 / 30000.0), 10);

        // 由 frameDuration 反算的帧率会带来微小误差，帧边界不能因此后退一帧
        let parsed = FrameGrid::new(1.0 / (1001.0 / 30000.0)).unwrap();
        assert_eq!(parsed.frame_at(89_089), 90);
        assert_eq!(parsed.frame_at(0), 1);
    }

    #[test]
    fn test_retime_curve_frames() {
        let grid = FrameGrid::new(30.0).unwrap();
        let timing = ClipTiming::new(5.0, 2.0, grid);
        // 片段从源媒体的第 1 秒开始
        let node_offset = timing.in_ticks - 30_000;
        let curve = RetimeCurve::new(timing, node_offset, grid);
        assert_eq!(curve.start_local, 30_000);
        assert_eq!(curve.start_frame, 31);
        assert_eq!(curve.end_local, 89_000);
        assert_eq!(curve.end_frame, 90);
    }

    #[test]
    fn test_invalid_frame_rate() {
        assert!(FrameGrid::new(0.0).is_err());
        assert!(FrameGrid::new(f64::NAN).is_err());
    }
}
