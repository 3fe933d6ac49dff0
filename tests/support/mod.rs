//! 結合テスト用のホスト
//!
//! 指定した変更だけを拒否するホスト（ホスト側の書き込み失敗を再現）

use snha_tools::error::{Result, ToolError};
use snha_tools::host::{
    AnnotationInstance, AnnotationType, Change, DetailLine, ElementRef, HostModel, LineStyle, ModelDocument, Revision,
    Sheet, View, Viewer, Wall,
};
use snha_tools_common::{ElementId, Parameter};

pub struct RejectingHost {
    pub inner: ModelDocument,
    reject: Box<dyn Fn(&Change) -> bool>,
    pub rejected: usize,
}

impl RejectingHost {
    pub fn new(inner: ModelDocument, reject: impl Fn(&Change) -> bool + 'static) -> Self {
        Self {
            inner,
            reject: Box::new(reject),
            rejected: 0,
        }
    }
}

impl HostModel for RejectingHost {
    fn is_modified(&self) -> bool {
        self.inner.is_modified()
    }

    fn active_view(&self) -> Option<ElementId> {
        self.inner.active_view()
    }

    fn element(&self, id: ElementId) -> Option<ElementRef<'_>> {
        self.inner.element(id)
    }

    fn selection(&self) -> Vec<ElementId> {
        self.inner.selection()
    }

    fn views(&self) -> Vec<&View> {
        self.inner.views()
    }

    fn walls_visible_in(&self, view: ElementId) -> Vec<&Wall> {
        self.inner.walls_visible_in(view)
    }

    fn line_styles(&self) -> Vec<&LineStyle> {
        self.inner.line_styles()
    }

    fn detail_lines_in(&self, view: ElementId) -> Vec<&DetailLine> {
        self.inner.detail_lines_in(view)
    }

    fn annotation_types(&self) -> Vec<&AnnotationType> {
        self.inner.annotation_types()
    }

    fn annotation_instances(&self) -> Vec<&AnnotationInstance> {
        self.inner.annotation_instances()
    }

    fn revisions(&self) -> Vec<&Revision> {
        self.inner.revisions()
    }

    fn sheets(&self) -> Vec<&Sheet> {
        self.inner.sheets()
    }

    fn sheet_parameters(&self, sheet: ElementId) -> Vec<&Parameter> {
        self.inner.sheet_parameters(sheet)
    }

    fn viewers(&self) -> Vec<&Viewer> {
        self.inner.viewers()
    }

    fn apply(&mut self, change: &Change) -> Result<Option<ElementId>> {
        if (self.reject)(change) {
            self.rejected += 1;
            return Err(ToolError::HostWrite(format!("拒否: {}", change)));
        }
        self.inner.apply(change)
    }

    fn begin_transaction(&mut self, label: &str) -> Result<()> {
        self.inner.begin_transaction(label)
    }

    fn commit_transaction(&mut self) -> Result<()> {
        self.inner.commit_transaction()
    }

    fn rollback_transaction(&mut self) -> Result<()> {
        self.inner.rollback_transaction()
    }
}
