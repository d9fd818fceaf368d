//! # Motion 生成器 - 节点 ID 分配

use tracing::trace;

/// 场景中固定使用的结构性 ID，分配器永远不会发出它们。
pub(super) const FOOTAGE_ID: u32 = 3;
pub(super) const MASTER_ID: u32 = 9999;
pub(super) const AUDIO_MASTER_ID: u32 = 9998;

const RESERVED_IDS: [u32; 3] = [FOOTAGE_ID, AUDIO_MASTER_ID, MASTER_ID];

/// 顺序递增的 ID 分配器，跳过保留 ID。
///
/// 分配器是一个普通的值，在生成过程中显式传递，相同的起点总是得到相同的序列。
#[derive(Debug, Clone)]
pub(super) struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub(super) const fn starting_at(base: u32) -> Self {
        Self { next: base }
    }

    /// 下一个将被分配的 ID（不消耗）。
    pub(super) fn peek(&self) -> u32 {
        let mut candidate = self.next;
        while RESERVED_IDS.contains(&candidate) {
            candidate += 1;
        }
        candidate
    }

    pub(super) fn next_id(&mut self) -> u32 {
        let id = self.peek();
        self.next = id + 1;
        trace!("分配节点 ID {id}");
        id
    }
}
