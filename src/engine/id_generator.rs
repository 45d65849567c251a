// ==========================================
// 宝石库存表格管理 - 编号生成器
// ==========================================
// 职责: 生成记录标识（永不复用）与业务编号（连续、定宽补零）
// 红线: 复制/粘贴/新增的记录一律分配新标识与新业务编号
// ==========================================

use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdGenerator {
    business_id_width: usize,
}

impl IdGenerator {
    pub fn new(business_id_width: usize) -> Self {
        Self {
            business_id_width: business_id_width.max(1),
        }
    }

    /// 新记录标识
    pub fn record_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    /// 生成 count 个连续业务编号
    ///
    /// # 参数
    /// - existing: 当前全部业务编号
    ///
    /// # 返回
    /// 从现有最大数字编号 + 1 起的连续编号块；非数字编号不参与计算，
    /// 也不可能与纯数字的新编号冲突。号段到达 u64 上限后，
    /// 剩余编号从最小的未占用数字回填
    pub fn next_business_ids<'a, I>(&self, existing: I, count: usize) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let taken: HashSet<u64> = existing
            .into_iter()
            .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
            .filter_map(|id| id.parse::<u64>().ok())
            .collect();
        let max = taken.iter().copied().max().unwrap_or(0);

        let mut ids = Vec::with_capacity(count);
        let mut next = max.checked_add(1);
        let mut backfill = 1u64;
        while ids.len() < count {
            match next {
                Some(number) => {
                    ids.push(self.format_business_id(number));
                    next = number.checked_add(1);
                }
                None => {
                    while taken.contains(&backfill) {
                        backfill += 1;
                    }
                    ids.push(self.format_business_id(backfill));
                    backfill += 1;
                }
            }
        }
        ids
    }

    pub fn format_business_id(&self, number: u64) -> String {
        format!("{:0width$}", number, width = self.business_id_width)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(6)
    }
}
