//! Hook 适配层 - 接收宿主回调，提取事件数据并交给通知管线
//!
//! 宿主通过 `HookRegistry` 按名称分发回调；每个处理函数接收普通的
//! 数据结构，总是返回 `true` 以便宿主继续执行后续 hook。

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::notification::{
    target_url, NotificationDispatcher, NotificationEvent, NotificationTarget, SendResult,
};
use crate::settings::{ProjectNotificationConfig, Settings};

/// 宿主项目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub identifier: String,
    pub name: String,
    #[serde(flatten)]
    pub notification: ProjectNotificationConfig,
}

/// 宿主问题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: u64,
    pub subject: String,
    /// 跟踪类型（Bug / Feature ...）
    pub tracker: String,
    pub project: Project,
}

/// 问题保存回调上下文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueContext {
    /// 当前操作用户名
    pub actor: String,
    pub issue: Issue,
    /// 本次更新的评论
    #[serde(default)]
    pub notes: Option<String>,
}

/// 宿主 Wiki 页面
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiPage {
    pub title: String,
    pub project: Project,
}

impl WikiPage {
    /// 展示用标题（下划线换成空格）
    pub fn pretty_title(&self) -> String {
        self.title.replace('_', " ")
    }
}

/// Wiki 保存回调上下文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiContext {
    pub actor: String,
    pub page: WikiPage,
}

/// 通知 hook 集合
pub struct NotificationHooks {
    settings: Settings,
    dispatcher: NotificationDispatcher,
}

impl NotificationHooks {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            dispatcher: NotificationDispatcher::new(),
        }
    }

    pub fn with_dispatcher(mut self, dispatcher: NotificationDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// 新建问题保存后
    pub fn controller_issues_new_after_save(&self, ctx: &IssueContext) -> bool {
        let issue = &ctx.issue;
        let event = NotificationEvent::IssueCreated {
            actor: ctx.actor.clone(),
            project: issue.project.name.clone(),
            category: issue.tracker.clone(),
            issue_id: issue.id,
            subject: issue.subject.clone(),
            url: self.issue_url(issue),
        };
        self.deliver(&event, &issue.project);
        true
    }

    /// 问题更新保存后
    pub fn controller_issues_edit_after_save(&self, ctx: &IssueContext) -> bool {
        let issue = &ctx.issue;
        let event = NotificationEvent::IssueUpdated {
            actor: ctx.actor.clone(),
            project: issue.project.name.clone(),
            category: issue.tracker.clone(),
            issue_id: issue.id,
            subject: issue.subject.clone(),
            comment: ctx.notes.clone(),
            url: self.issue_url(issue),
        };
        self.deliver(&event, &issue.project);
        true
    }

    /// Wiki 页面保存后
    pub fn controller_wiki_edit_after_save(&self, ctx: &WikiContext) -> bool {
        let page = &ctx.page;
        let target = NotificationTarget::WikiPage {
            project_identifier: page.project.identifier.clone(),
            title: page.title.clone(),
        };
        let event = NotificationEvent::WikiPageEdited {
            actor: ctx.actor.clone(),
            project: page.project.name.clone(),
            page_title: page.pretty_title(),
            url: target_url(&target, &self.settings.host),
        };
        self.deliver(&event, &page.project);
        true
    }

    fn issue_url(&self, issue: &Issue) -> Option<String> {
        target_url(&NotificationTarget::Issue { id: issue.id }, &self.settings.host)
    }

    fn deliver(&self, event: &NotificationEvent, project: &Project) -> SendResult {
        let result = self.dispatcher.dispatch(event, project, &self.settings.hipchat);
        debug!(event = event.kind(), project_id = %project.id, ?result, "Hook finished");
        result
    }
}

/// 以 JSON 负载调用的 hook 处理函数
pub type HookHandler = fn(&NotificationHooks, &str) -> Result<bool>;

/// hook 名称 → 处理函数
pub struct HookRegistry {
    handlers: BTreeMap<&'static str, HookHandler>,
}

impl HookRegistry {
    /// 空注册表
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// 注册三个内置 hook
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("controller_issues_new_after_save", issue_created_hook);
        registry.register("controller_issues_edit_after_save", issue_updated_hook);
        registry.register("controller_wiki_edit_after_save", wiki_edited_hook);
        registry
    }

    pub fn register(&mut self, name: &'static str, handler: HookHandler) {
        self.handlers.insert(name, handler);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    /// 调用指定 hook；未知名称或负载无法解析时返回错误
    pub fn call(&self, hooks: &NotificationHooks, name: &str, payload: &str) -> Result<bool> {
        let handler = self
            .handlers
            .get(name)
            .ok_or_else(|| anyhow!("Unknown hook: {}", name))?;
        handler(hooks, payload)
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn issue_created_hook(hooks: &NotificationHooks, payload: &str) -> Result<bool> {
    let ctx: IssueContext = parse_payload(payload)?;
    Ok(hooks.controller_issues_new_after_save(&ctx))
}

fn issue_updated_hook(hooks: &NotificationHooks, payload: &str) -> Result<bool> {
    let ctx: IssueContext = parse_payload(payload)?;
    Ok(hooks.controller_issues_edit_after_save(&ctx))
}

fn wiki_edited_hook(hooks: &NotificationHooks, payload: &str) -> Result<bool> {
    let ctx: WikiContext = parse_payload(payload)?;
    Ok(hooks.controller_wiki_edit_after_save(&ctx))
}

fn parse_payload<T: DeserializeOwned>(payload: &str) -> Result<T> {
    serde_json::from_str(payload).context("Failed to parse hook payload")
}
