use std::collections::VecDeque;
use std::rc::Rc;

use fancy_regex::Regex;
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::dom::{Dom, FileUpload, NodeId};
use crate::event::{EventState, Handler, ListenerStore};
use crate::html;
use crate::router::RoutePath;
use crate::selector;
use crate::session::Storage;
use crate::store::BillsApi;
use crate::{Error, Result};

/// A queued completion: the resumption of an asynchronous backend call.
/// Delivered in FIFO order by [`Window::flush`].
pub(crate) type Task = Box<dyn FnOnce(&mut Window) -> Result<()>>;

/// The document shell. Owns the DOM, the listener store, the session
/// storage, the backend client handle, the current route and the task
/// queue. Everything runs on the caller's thread; nothing happens between
/// simulation calls.
pub struct Window {
    pub(crate) dom: Dom,
    listeners: ListenerStore,
    storage: Storage,
    store: Rc<dyn BillsApi>,
    route: RoutePath,
    tasks: VecDeque<Task>,
    task_step_limit: usize,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("route", &self.route)
            .field("nodes", &self.dom.nodes.len())
            .field("pending_tasks", &self.tasks.len())
            .finish()
    }
}

fn normalized(text: &str) -> String {
    text.trim().nfc().collect()
}

impl Window {
    /// An empty document holding only the `#root` mount point, the way the
    /// application boots before the router renders anything.
    pub fn new(store: Rc<dyn BillsApi>) -> Result<Self> {
        let mut dom = Dom::new();
        let root = dom.root();
        html::parse_fragment(&mut dom, root, "<div id='root'></div>")?;
        dom.reindex_ids(root);
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            storage: Storage::new(),
            store,
            route: RoutePath::Login,
            tasks: VecDeque::new(),
            task_step_limit: 10_000,
        })
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    pub fn store(&self) -> Rc<dyn BillsApi> {
        Rc::clone(&self.store)
    }

    pub fn route(&self) -> RoutePath {
        self.route
    }

    pub(crate) fn set_route(&mut self, route: RoutePath) {
        self.route = route;
    }

    pub(crate) fn root_mount(&self) -> Result<NodeId> {
        self.dom
            .by_id("root")
            .ok_or_else(|| Error::DomMisuse("document has no #root mount".into()))
    }

    /// Replaces the page body under `#root`. Every listener registration is
    /// dropped with the old subtree.
    pub fn set_body_html(&mut self, markup: &str) -> Result<()> {
        let root = self.root_mount()?;
        self.listeners.clear();
        html::set_inner_html(&mut self.dom, root, markup)
    }

    // ---- selection ----------------------------------------------------

    pub fn select_one(&self, selector: &str) -> Result<NodeId> {
        selector::query_one(&self.dom, selector)
    }

    pub fn select_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        selector::query_all(&self.dom, selector)
    }

    /// Exactly one element carrying `data-testid`, testing-library style:
    /// zero matches and more than one are both errors.
    pub fn get_by_test_id(&self, test_id: &str) -> Result<NodeId> {
        let selector = format!("[data-testid='{test_id}']");
        let matches = self.select_all(&selector)?;
        match matches.as_slice() {
            [] => Err(Error::SelectorNotFound(selector)),
            [only] => Ok(*only),
            many => Err(Error::TypeMismatch {
                selector,
                expected: "exactly one match".into(),
                actual: format!("{} matches", many.len()),
            }),
        }
    }

    pub fn get_all_by_test_id(&self, test_id: &str) -> Result<Vec<NodeId>> {
        let selector = format!("[data-testid='{test_id}']");
        let matches = self.select_all(&selector)?;
        if matches.is_empty() {
            return Err(Error::SelectorNotFound(selector));
        }
        Ok(matches)
    }

    /// The innermost element whose text content equals `text` after NFC
    /// normalization and trimming.
    pub fn get_by_text(&self, text: &str) -> Result<NodeId> {
        let wanted = normalized(text);
        let matches = self
            .dom
            .walk_elements(self.dom.root())
            .into_iter()
            .filter(|node| normalized(&self.dom.text_content(*node)) == wanted)
            .collect::<Vec<_>>();
        let innermost = matches
            .iter()
            .copied()
            .filter(|node| {
                !matches
                    .iter()
                    .any(|other| other != node && self.dom.is_descendant_of(*other, *node))
            })
            .collect::<Vec<_>>();
        match innermost.as_slice() {
            [] => Err(Error::SelectorNotFound(format!("text: {text}"))),
            [only] => Ok(*only),
            many => Err(Error::TypeMismatch {
                selector: format!("text: {text}"),
                expected: "exactly one match".into(),
                actual: format!("{} matches", many.len()),
            }),
        }
    }

    /// Text nodes whose full content matches `pattern`, in document order.
    pub fn find_text_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let regex =
            Regex::new(pattern).map_err(|err| Error::Pattern(format!("{pattern}: {err}")))?;
        let mut out = Vec::new();
        for (_, text) in self.dom.walk_texts(self.dom.root()) {
            let candidate = normalized(&text);
            if regex
                .is_match(&candidate)
                .map_err(|err| Error::Pattern(format!("{pattern}: {err}")))?
            {
                out.push(candidate);
            }
        }
        Ok(out)
    }

    // ---- element accessors --------------------------------------------

    pub fn text(&self, selector: &str) -> Result<String> {
        let node = self.select_one(selector)?;
        Ok(self.dom.text_content(node))
    }

    pub fn node_text(&self, node: NodeId) -> String {
        self.dom.text_content(node)
    }

    pub fn attr(&self, node: NodeId, key: &str) -> Option<String> {
        self.dom.attr(node, key).map(str::to_string)
    }

    pub fn set_attr(&mut self, node: NodeId, key: &str, value: &str) -> Result<()> {
        self.dom.set_attr(node, key, value)
    }

    pub fn remove_attr(&mut self, node: NodeId, key: &str) -> Result<()> {
        self.dom.remove_attr(node, key)
    }

    pub fn value_of(&self, node: NodeId) -> Result<String> {
        self.dom.value(node).map(str::to_string)
    }

    pub fn files_of(&self, node: NodeId) -> Result<Vec<FileUpload>> {
        self.dom.files(node).map(<[FileUpload]>::to_vec)
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.dom.has_class(node, class)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.dom.add_class(node, class)
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) -> Result<()> {
        self.dom.remove_class(node, class)
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) -> Result<()> {
        self.dom.set_text_content(node, text)
    }

    pub fn set_node_inner_html(&mut self, node: NodeId, markup: &str) -> Result<()> {
        html::set_inner_html(&mut self.dom, node, markup)
    }

    pub fn body_html(&self) -> String {
        self.dom.dump_node(self.dom.root())
    }

    // ---- listeners and dispatch ---------------------------------------

    pub fn add_listener(&mut self, node: NodeId, event: &str, handler: Handler) {
        self.listeners.add(node, event, handler);
    }

    pub fn add_listener_on(&mut self, selector: &str, event: &str, handler: Handler) -> Result<()> {
        let node = self.select_one(selector)?;
        self.add_listener(node, event, handler);
        Ok(())
    }

    /// Target phase then bubble phase, stopping when a handler asks to.
    pub(crate) fn dispatch_node(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target);
        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }
        debug!(event_type, path_len = path.len(), "dispatch");

        for node in path {
            event.current_target = node;
            for handler in self.listeners.get(node, event_type) {
                handler(self, &mut event)?;
            }
            if event.propagation_stopped {
                break;
            }
        }
        Ok(event)
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_node(target, event)?;
        Ok(())
    }

    // ---- simulation ---------------------------------------------------

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.click_node(target)
    }

    pub fn click_node(&mut self, target: NodeId) -> Result<()> {
        let outcome = self.dispatch_node(target, "click")?;
        if outcome.default_prevented {
            return Ok(());
        }
        if self.is_submit_control(target) {
            if let Some(form) = self.enclosing_form(target) {
                self.dispatch_node(form, "submit")?;
            }
        }
        Ok(())
    }

    fn is_submit_control(&self, node: NodeId) -> bool {
        let Some(element) = self.dom.element(node) else {
            return false;
        };
        match element.tag_name.as_str() {
            "button" => element
                .attrs
                .get("type")
                .map(|kind| kind.eq_ignore_ascii_case("submit"))
                .unwrap_or(true),
            "input" => element
                .attrs
                .get("type")
                .map(|kind| kind.eq_ignore_ascii_case("submit"))
                .unwrap_or(false),
            _ => false,
        }
    }

    fn enclosing_form(&self, node: NodeId) -> Option<NodeId> {
        let mut cursor = self.dom.parent(node);
        while let Some(current) = cursor {
            if self
                .dom
                .tag_name(current)
                .map(|tag| tag.eq_ignore_ascii_case("form"))
                .unwrap_or(false)
            {
                return Some(current);
            }
            cursor = self.dom.parent(current);
        }
        None
    }

    pub fn set_value(&mut self, selector: &str, value: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_value(target, value)?;
        self.dispatch_node(target, "input")?;
        self.dispatch_node(target, "change")?;
        Ok(())
    }

    /// Hands a file to a file input and fires `change`, the way a user
    /// picking a file in the chooser would.
    pub fn attach_file(&mut self, selector: &str, name: &str, mime_type: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let is_file_input = self
            .dom
            .element(target)
            .map(|element| {
                element.tag_name.eq_ignore_ascii_case("input")
                    && element
                        .attrs
                        .get("type")
                        .map(|kind| kind.eq_ignore_ascii_case("file"))
                        .unwrap_or(false)
            })
            .unwrap_or(false);
        if !is_file_input {
            return Err(Error::TypeMismatch {
                selector: selector.into(),
                expected: "input[type=file]".into(),
                actual: self.dom.snippet(target),
            });
        }
        self.dom.set_files(
            target,
            vec![FileUpload {
                name: name.to_string(),
                mime_type: mime_type.to_string(),
            }],
        )?;
        self.dom
            .set_value(target, &format!("C:\\fakepath\\{name}"))?;
        self.dispatch_node(target, "change")?;
        Ok(())
    }

    pub fn submit(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let form = if self
            .dom
            .tag_name(target)
            .map(|tag| tag.eq_ignore_ascii_case("form"))
            .unwrap_or(false)
        {
            Some(target)
        } else {
            self.enclosing_form(target)
        };
        if let Some(form) = form {
            self.dispatch_node(form, "submit")?;
        }
        Ok(())
    }

    // ---- task queue ---------------------------------------------------

    pub(crate) fn enqueue(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Drains the task queue in FIFO order, including tasks the drained
    /// tasks enqueue. Returns how many ran.
    pub fn flush(&mut self) -> Result<usize> {
        let mut steps = 0usize;
        while let Some(task) = self.tasks.pop_front() {
            if steps >= self.task_step_limit {
                return Err(Error::TaskStepLimit(self.task_step_limit));
            }
            steps += 1;
            debug!(step = steps, "task delivered");
            task(self)?;
        }
        Ok(steps)
    }

    // ---- assertions ---------------------------------------------------

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        self.select_one(selector)?;
        Ok(())
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let node = self.select_one(selector)?;
        let actual = normalized(&self.dom.text_content(node));
        if actual != normalized(expected) {
            return Err(Error::AssertionFailed {
                selector: selector.into(),
                expected: expected.into(),
                actual,
                dom_snippet: self.dom.snippet(node),
            });
        }
        Ok(())
    }

    pub fn assert_text_contains(&self, selector: &str, expected: &str) -> Result<()> {
        let node = self.select_one(selector)?;
        let actual = normalized(&self.dom.text_content(node));
        if !actual.contains(&normalized(expected)) {
            return Err(Error::AssertionFailed {
                selector: selector.into(),
                expected: format!("text containing {expected:?}"),
                actual,
                dom_snippet: self.dom.snippet(node),
            });
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let node = self.select_one(selector)?;
        let actual = self.dom.value(node)?;
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.into(),
                expected: expected.into(),
                actual: actual.to_string(),
                dom_snippet: self.dom.snippet(node),
            });
        }
        Ok(())
    }

    pub fn assert_class(&self, selector: &str, class: &str, expected: bool) -> Result<()> {
        let node = self.select_one(selector)?;
        let actual = self.dom.has_class(node, class);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.into(),
                expected: format!("class {class:?} present: {expected}"),
                actual: format!("class {class:?} present: {actual}"),
                dom_snippet: self.dom.snippet(node),
            });
        }
        Ok(())
    }
}
