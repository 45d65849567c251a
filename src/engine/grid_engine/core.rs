use crate::config::ImportPolicy;
use crate::domain::field::{Field, FieldKind};
use crate::domain::record::InventoryRecord;
use crate::domain::types::{CellPosition, SortSpec};
use crate::engine::column_layout::ColumnLayout;
use crate::engine::derived_view::{compute_view, ViewQuery};
use crate::engine::error::{GridError, GridResult};
use crate::engine::id_generator::IdGenerator;
use crate::engine::navigation::navigable_fields;
use crate::engine::record_store::RecordStore;
use crate::engine::upload_tracker::UploadTracker;
use crate::importer::{CellValidator, FieldValidator};
use std::collections::HashSet;
use tracing::debug;

// ==========================================
// EditorKind - 编辑器类型
// ==========================================
// 由字段能力决定：下拉字段单选提交，其余自由文本
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    FreeText,
    Dropdown(&'static [&'static str]),
}

impl EditorKind {
    pub fn for_field(field: Field) -> Self {
        match field.kind() {
            FieldKind::Enumerated(values) => EditorKind::Dropdown(values),
            FieldKind::Text | FieldKind::Numeric => EditorKind::FreeText,
        }
    }
}

// ==========================================
// EditSession - 打开中的编辑光标
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub position: CellPosition,
    pub editor: EditorKind,
    // 尚未提交的输入；None 表示未输入，提交时不改动记录
    pub(super) draft: Option<String>,
}

impl EditSession {
    pub(super) fn open(position: CellPosition) -> Self {
        let editor = EditorKind::for_field(position.field);
        Self {
            position,
            editor,
            draft: None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        self.draft.as_deref()
    }
}

// ==========================================
// GridEngine - 表格交互引擎
// ==========================================
pub struct GridEngine {
    pub(super) store: RecordStore,
    pub(super) query: ViewQuery,
    pub(super) columns: ColumnLayout,
    pub(super) selection: HashSet<String>,
    pub(super) cursor: Option<EditSession>,
    pub(super) dirty: HashSet<String>,
    pub(super) clipboard: Vec<InventoryRecord>,
    pub(super) text_clipboard: Option<String>,
    pub(super) uploads: UploadTracker,
    pub(super) ids: IdGenerator,
    pub(super) validator: Box<dyn CellValidator>,
}

impl GridEngine {
    /// 创建空表格
    ///
    /// # 参数
    /// - business_id_width: 业务编号补零宽度
    pub fn new(business_id_width: usize) -> Self {
        Self::with_records(Vec::new(), business_id_width)
    }

    pub fn with_records(records: Vec<InventoryRecord>, business_id_width: usize) -> Self {
        Self {
            store: RecordStore::from_records(records),
            query: ViewQuery::default(),
            columns: ColumnLayout::default(),
            selection: HashSet::new(),
            cursor: None,
            dirty: HashSet::new(),
            clipboard: Vec::new(),
            text_clipboard: None,
            uploads: UploadTracker::new(),
            ids: IdGenerator::new(business_id_width),
            validator: Box::new(FieldValidator::new()),
        }
    }

    pub fn from_policy(policy: &ImportPolicy) -> Self {
        Self::new(policy.business_id_width)
    }

    /// 替换单元格校验器（提交时重新校验使用）
    pub fn with_validator(mut self, validator: Box<dyn CellValidator>) -> Self {
        self.validator = validator;
        self
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn records(&self) -> &[InventoryRecord] {
        self.store.records()
    }

    pub fn record(&self, id: &str) -> Option<&InventoryRecord> {
        self.store.get(id)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// 当前派生视图（每次调用全量重算）
    pub fn view(&self) -> Vec<&InventoryRecord> {
        compute_view(self.store.records(), &self.query)
    }

    pub fn view_ids(&self) -> Vec<String> {
        self.view().into_iter().map(|r| r.id.clone()).collect()
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn columns(&self) -> &ColumnLayout {
        &self.columns
    }

    pub fn navigable_columns(&self) -> Vec<Field> {
        navigable_fields(&self.columns)
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.cursor.as_ref()
    }

    pub fn cursor(&self) -> Option<&CellPosition> {
        self.cursor.as_ref().map(|s| &s.position)
    }

    pub fn selection(&self) -> &HashSet<String> {
        &self.selection
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.contains(id)
    }

    pub fn is_dirty(&self, id: &str) -> bool {
        self.dirty.contains(id)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// 未保存记录标识（按存储顺序）
    pub fn dirty_ids(&self) -> Vec<String> {
        self.store
            .records()
            .iter()
            .filter(|r| self.dirty.contains(&r.id))
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn clipboard(&self) -> &[InventoryRecord] {
        &self.clipboard
    }

    pub fn text_clipboard(&self) -> Option<&str> {
        self.text_clipboard.as_deref()
    }

    pub fn is_busy(&self, record_id: &str, field: Field) -> bool {
        self.uploads.is_busy(record_id, field)
    }

    pub fn uploads_in_flight(&self) -> usize {
        self.uploads.in_flight()
    }

    // ==========================================
    // 视图条件
    // ==========================================

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.query.search = term.into();
        debug!(search = %self.query.search, "搜索词变更");
        self.prune_cursor();
    }

    /// 设置列过滤；空串移除该列过滤
    pub fn set_column_filter(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        if value.is_empty() {
            self.query.column_filters.remove(&field);
        } else {
            self.query.column_filters.insert(field, value);
        }
        debug!(field = %field, "列过滤变更");
        self.prune_cursor();
    }

    pub fn clear_filters(&mut self) {
        self.query.search.clear();
        self.query.column_filters.clear();
    }

    /// 请求对某列排序（三态循环）
    ///
    /// # 返回
    /// 新的排序规格（None = 未排序）
    pub fn request_sort(&mut self, field: Field) -> Option<SortSpec> {
        self.query.sort = SortSpec::cycle(self.query.sort, field);
        debug!(field = %field, sort = ?self.query.sort, "排序变更");
        self.query.sort
    }

    // ==========================================
    // 列展示配置
    // ==========================================

    pub fn set_column_visible(&mut self, field: Field, visible: bool) {
        self.columns.set_visible(field, visible);
        self.prune_cursor();
    }

    pub fn toggle_column(&mut self, field: Field) -> bool {
        let visible = self.columns.toggle(field);
        self.prune_cursor();
        visible
    }

    pub fn rename_column(&mut self, field: Field, label: Option<String>) {
        self.columns.rename(field, label);
    }

    pub fn column_label(&self, field: Field) -> String {
        self.columns.label(field)
    }

    // ==========================================
    // 选择
    // ==========================================

    /// 切换选择，返回切换后是否选中
    pub fn toggle_select(&mut self, id: &str) -> GridResult<bool> {
        let selected = !self.selection.contains(id);
        self.set_selected(id, selected)?;
        Ok(selected)
    }

    pub fn set_selected(&mut self, id: &str, selected: bool) -> GridResult<()> {
        if !self.store.contains(id) {
            return Err(GridError::RecordNotFound(id.to_string()));
        }
        if selected {
            self.selection.insert(id.to_string());
        } else {
            self.selection.remove(id);
        }
        Ok(())
    }

    /// 选中当前视图中的全部记录
    pub fn select_all_visible(&mut self) -> usize {
        let ids = self.view_ids();
        let count = ids.len();
        self.selection.extend(ids);
        count
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // ==========================================
    // 内部工具
    // ==========================================

    /// 光标所在行已不在视图中，或所在列不可导航时关闭光标
    pub(super) fn prune_cursor(&mut self) {
        let Some(session) = &self.cursor else {
            return;
        };
        let row_visible = self.view().iter().any(|r| r.id == session.position.record_id);
        let column_navigable = self.navigable_columns().contains(&session.position.field);
        if !row_visible || !column_navigable {
            debug!(record_id = %session.position.record_id, "光标位置已不可见，关闭光标");
            self.cursor = None;
        }
    }

    /// 删除/替换记录后清理选择与未保存集合
    pub(super) fn prune_dangling(&mut self) {
        let store = &self.store;
        self.selection.retain(|id| store.contains(id));
        self.dirty.retain(|id| store.contains(id));
        if let Some(session) = &self.cursor {
            if !store.contains(&session.position.record_id) {
                self.cursor = None;
            }
        }
    }
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::from_policy(&ImportPolicy::default())
    }
}
