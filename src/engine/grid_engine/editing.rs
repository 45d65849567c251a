// ==========================================
// 编辑光标状态机: 无光标 | 编辑中(记录, 字段)
// ==========================================

use super::core::{EditSession, EditorKind, GridEngine};
use crate::domain::field::{is_editable, Field};
use crate::domain::types::{CellPosition, FieldValue};
use crate::engine::error::{GridError, GridResult};
use crate::engine::navigation::{next_position, NavigationKey};
use tracing::{debug, info, instrument, warn};

impl GridEngine {
    /// 打开单元格编辑
    ///
    /// 已有光标时先按失焦语义提交其草稿
    ///
    /// # 返回
    /// - Err(FieldNotEditable): 附件字段，状态不变
    /// - Err(RecordNotFound) / Err(CellBusy): 状态不变
    #[instrument(skip(self))]
    pub fn start_edit(&mut self, record_id: &str, field: Field) -> GridResult<()> {
        if !is_editable(field) {
            return Err(GridError::FieldNotEditable(field));
        }
        if !self.store.contains(record_id) {
            return Err(GridError::RecordNotFound(record_id.to_string()));
        }
        if self.uploads.is_busy(record_id, field) {
            return Err(GridError::CellBusy {
                record_id: record_id.to_string(),
                field,
            });
        }

        self.blur();
        self.cursor = Some(EditSession::open(CellPosition::new(record_id, field)));
        debug!("打开单元格编辑");
        Ok(())
    }

    /// 记录当前输入（不提交）
    ///
    /// # 返回
    /// - Err(InvalidOption): 下拉编辑器收到候选集合外的非空值，草稿不变
    pub fn input(&mut self, text: impl Into<String>) -> GridResult<()> {
        let text = text.into();
        let session = self.cursor.as_mut().ok_or(GridError::NoActiveEdit)?;

        if let EditorKind::Dropdown(options) = session.editor {
            let value = text.trim();
            if !value.is_empty() && !options.iter().any(|option| *option == value) {
                return Err(GridError::InvalidOption {
                    field: session.position.field,
                    value: text,
                });
            }
        }

        session.draft = Some(text);
        Ok(())
    }

    /// 处理导航按键
    ///
    /// # 返回
    /// 新光标位置（None = 光标已关闭）
    pub fn handle_key(&mut self, key: NavigationKey) -> GridResult<Option<CellPosition>> {
        let session = self.cursor.take().ok_or(GridError::NoActiveEdit)?;

        if key.commits() {
            if let Err(e) = self.commit_session(&session) {
                self.cursor = Some(session);
                return Err(e);
            }
        } else {
            debug!(record_id = %session.position.record_id, "取消编辑，丢弃输入");
        }

        let next = next_position(
            &session.position,
            key,
            &self.view_ids(),
            &self.navigable_columns(),
        );
        self.cursor = next.clone().map(EditSession::open);
        Ok(next)
    }

    /// 失焦提交并关闭光标
    pub fn commit_edit(&mut self) -> GridResult<()> {
        let session = self.cursor.take().ok_or(GridError::NoActiveEdit)?;
        if let Err(e) = self.commit_session(&session) {
            self.cursor = Some(session);
            return Err(e);
        }
        Ok(())
    }

    /// 关闭光标，记录不变
    pub fn cancel_edit(&mut self) {
        self.cursor = None;
    }

    /// 下拉选择：立即提交并关闭光标
    ///
    /// # 返回
    /// - Err(InvalidOption): 值不在候选集合中，光标保持
    pub fn choose_option(&mut self, value: &str) -> GridResult<()> {
        let session = self.cursor.as_ref().ok_or(GridError::NoActiveEdit)?;

        if let EditorKind::Dropdown(options) = session.editor {
            if !options.iter().any(|option| *option == value) {
                return Err(GridError::InvalidOption {
                    field: session.position.field,
                    value: value.to_string(),
                });
            }
        }

        self.input(value)?;
        self.commit_edit()
    }

    /// 直接写入单元格（不经过光标）
    pub fn set_cell_value(&mut self, record_id: &str, field: Field, raw: &str) -> GridResult<()> {
        if !is_editable(field) {
            return Err(GridError::FieldNotEditable(field));
        }
        self.write_cell(record_id, field, raw)
    }

    /// 复制单元格显示文本到文本剪贴板
    pub fn copy_cell_value(&mut self, record_id: &str, field: Field) -> GridResult<String> {
        let record = self
            .store
            .get(record_id)
            .ok_or_else(|| GridError::RecordNotFound(record_id.to_string()))?;
        let text = record.get(field).to_string();
        self.text_clipboard = Some(text.clone());
        Ok(text)
    }

    // ==========================================
    // 内部工具
    // ==========================================

    /// 失焦：提交当前草稿并关闭光标，失败只记录日志
    pub(super) fn blur(&mut self) {
        if let Some(session) = self.cursor.take() {
            if let Err(e) = self.commit_session(&session) {
                warn!(error = %e, "失焦提交失败，草稿丢弃");
            }
        }
    }

    fn commit_session(&mut self, session: &EditSession) -> GridResult<()> {
        match &session.draft {
            Some(raw) => self.write_cell(&session.position.record_id, session.position.field, raw),
            None => Ok(()),
        }
    }

    /// 写值 + 重新校验 + 标记未保存
    ///
    /// 数值字段解析失败回落 0，同时标记该字段无效
    fn write_cell(&mut self, record_id: &str, field: Field, raw: &str) -> GridResult<()> {
        if self.uploads.is_busy(record_id, field) {
            return Err(GridError::CellBusy {
                record_id: record_id.to_string(),
                field,
            });
        }

        let valid = self.validator.validate(field, raw);
        let record = self
            .store
            .get_mut(record_id)
            .ok_or_else(|| GridError::RecordNotFound(record_id.to_string()))?;

        record.set(field, FieldValue::coerce(field, raw));
        record.set_invalid(field, !valid);
        self.dirty.insert(record_id.to_string());

        info!(record_id = %record_id, field = %field, valid, "单元格已提交");
        Ok(())
    }
}
