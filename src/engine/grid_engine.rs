// ==========================================
// 宝石库存表格管理 - 表格交互引擎
// ==========================================
// 职责: 编辑光标状态机、键盘导航、选择、剪贴板、
//       列展示配置、批量行操作、附件上传忙碌状态
// 输入: 操作员动作（单次调用即一次原子变更）
// 输出: 派生视图 + 通知
// ==========================================
// 红线: 所有变更串行执行；记录仓只在此同步修改
// 红线: 光标只会停在可见且可编辑的字段上
// ==========================================

mod core;
mod editing;
mod rows;
mod uploads;

#[cfg(test)]
mod tests;

pub use self::core::{EditSession, EditorKind, GridEngine};
