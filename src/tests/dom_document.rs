use std::cell::RefCell;
use std::rc::Rc;

use crate::page::Window;
use crate::store::MockStore;
use crate::{Error, Result};

fn empty_window() -> Result<Window> {
    Window::new(MockStore::empty())
}

#[test]
fn parses_fragment_and_reads_text() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html(
        "<div id='outer' class='a b'>\
           <p data-testid='greeting'>Bonjour <span>tout le monde</span></p>\
         </div>",
    )?;
    win.assert_text("#outer p", "Bonjour tout le monde")?;
    win.assert_class("#outer", "a", true)?;
    win.assert_class("#outer", "b", true)?;
    win.assert_class("#outer", "c", false)?;
    Ok(())
}

#[test]
fn decodes_character_references() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<p id='msg'>caf&eacute; &amp; th&#233;</p>")?;
    // Unknown named entities pass through untouched, numeric ones decode.
    win.assert_text("#msg", "caf&eacute; & thé")?;
    Ok(())
}

#[test]
fn rejects_malformed_fragments() -> Result<()> {
    let mut win = empty_window()?;
    assert!(matches!(
        win.set_body_html("<div><p>unclosed</div>"),
        Err(Error::HtmlParse(_))
    ));
    assert!(matches!(
        win.set_body_html("</p>"),
        Err(Error::HtmlParse(_))
    ));
    Ok(())
}

#[test]
fn selector_subset_matches_and_rejects() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html(
        "<section class='wrap'>\
           <ul><li class='item'>one</li><li class='item picked' data-k='v'>two</li></ul>\
         </section>",
    )?;
    assert_eq!(win.select_all("li")?.len(), 2);
    assert_eq!(win.select_all(".item")?.len(), 2);
    assert_eq!(win.select_all(".item.picked")?.len(), 1);
    assert_eq!(win.select_all("[data-k='v']")?.len(), 1);
    assert_eq!(win.select_all("section ul li")?.len(), 2);
    assert_eq!(win.select_all(".wrap .picked")?.len(), 1);
    assert!(matches!(
        win.select_all("li:first-child"),
        Err(Error::UnsupportedSelector(_))
    ));
    assert!(matches!(
        win.select_all("ul > li"),
        Err(Error::UnsupportedSelector(_))
    ));
    assert!(matches!(
        win.select_all("li, p"),
        Err(Error::UnsupportedSelector(_))
    ));
    assert!(matches!(
        win.select_one("#missing"),
        Err(Error::SelectorNotFound(_))
    ));
    Ok(())
}

#[test]
fn inner_html_replace_reindexes_ids() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<div id='host'><span id='old'>x</span></div>")?;
    let host = win.select_one("#host")?;
    win.set_node_inner_html(host, "<span id='fresh'>y</span>")?;
    win.assert_exists("#fresh")?;
    assert!(matches!(
        win.select_one("#old"),
        Err(Error::SelectorNotFound(_))
    ));
    Ok(())
}

#[test]
fn click_fires_listener_and_bubbles() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<div id='parent'><button id='btn' type='button'>go</button></div>")?;
    let order = Rc::new(RefCell::new(Vec::new()));

    let log = Rc::clone(&order);
    win.add_listener_on(
        "#btn",
        "click",
        Rc::new(move |_win, _event| {
            log.borrow_mut().push("target");
            Ok(())
        }),
    )?;
    let log = Rc::clone(&order);
    win.add_listener_on(
        "#parent",
        "click",
        Rc::new(move |_win, _event| {
            log.borrow_mut().push("parent");
            Ok(())
        }),
    )?;

    win.click("#btn")?;
    assert_eq!(*order.borrow(), vec!["target", "parent"]);
    Ok(())
}

#[test]
fn stop_propagation_halts_bubbling() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<div id='parent'><button id='btn' type='button'>go</button></div>")?;
    let reached_parent = Rc::new(RefCell::new(false));

    win.add_listener_on(
        "#btn",
        "click",
        Rc::new(|_win, event| {
            event.stop_propagation();
            Ok(())
        }),
    )?;
    let flag = Rc::clone(&reached_parent);
    win.add_listener_on(
        "#parent",
        "click",
        Rc::new(move |_win, _event| {
            *flag.borrow_mut() = true;
            Ok(())
        }),
    )?;

    win.click("#btn")?;
    assert!(!*reached_parent.borrow());
    Ok(())
}

#[test]
fn submit_button_click_reaches_form_unless_prevented() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<form id='f'><button id='send'>send</button></form>")?;
    let submits = Rc::new(RefCell::new(0usize));
    let count = Rc::clone(&submits);
    win.add_listener_on(
        "#f",
        "submit",
        Rc::new(move |_win, _event| {
            *count.borrow_mut() += 1;
            Ok(())
        }),
    )?;

    win.click("#send")?;
    assert_eq!(*submits.borrow(), 1);

    win.add_listener_on(
        "#send",
        "click",
        Rc::new(|_win, event| {
            event.prevent_default();
            Ok(())
        }),
    )?;
    win.click("#send")?;
    assert_eq!(*submits.borrow(), 1);
    Ok(())
}

#[test]
fn set_value_fires_input_then_change() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<input id='name'>")?;
    let seen = Rc::new(RefCell::new(Vec::new()));
    for event_name in ["input", "change"] {
        let log = Rc::clone(&seen);
        win.add_listener_on(
            "#name",
            event_name,
            Rc::new(move |_win, event| {
                log.borrow_mut().push(event.event_type.clone());
                Ok(())
            }),
        )?;
    }
    win.set_value("#name", "Jean")?;
    win.assert_value("#name", "Jean")?;
    assert_eq!(*seen.borrow(), vec!["input", "change"]);
    Ok(())
}

#[test]
fn attach_file_requires_a_file_input() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<input id='text-field' type='text'><input id='upload' type='file'>")?;
    assert!(matches!(
        win.attach_file("#text-field", "a.png", "image/png"),
        Err(Error::TypeMismatch { .. })
    ));
    win.attach_file("#upload", "a.png", "image/png")?;
    let upload = win.select_one("#upload")?;
    let files = win.files_of(upload)?;
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "a.png");
    win.assert_value("#upload", "C:\\fakepath\\a.png")?;
    Ok(())
}

#[test]
fn body_replacement_drops_old_listeners() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<button id='btn' type='button'>go</button>")?;
    let fired = Rc::new(RefCell::new(0usize));
    let count = Rc::clone(&fired);
    win.add_listener_on(
        "#btn",
        "click",
        Rc::new(move |_win, _event| {
            *count.borrow_mut() += 1;
            Ok(())
        }),
    )?;
    win.set_body_html("<button id='btn' type='button'>again</button>")?;
    win.click("#btn")?;
    assert_eq!(*fired.borrow(), 0);
    Ok(())
}

#[test]
fn tasks_flush_in_fifo_order_including_nested() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<p id='log'></p>")?;
    win.enqueue(Box::new(|win| {
        let log = win.select_one("#log")?;
        let text = win.node_text(log) + "a";
        win.set_text(log, &text)?;
        win.enqueue(Box::new(|win| {
            let log = win.select_one("#log")?;
            let text = win.node_text(log) + "c";
            win.set_text(log, &text)
        }));
        Ok(())
    }));
    win.enqueue(Box::new(|win| {
        let log = win.select_one("#log")?;
        let text = win.node_text(log) + "b";
        win.set_text(log, &text)
    }));
    assert_eq!(win.flush()?, 3);
    win.assert_text("#log", "abc")?;
    assert_eq!(win.pending_tasks(), 0);
    Ok(())
}

#[test]
fn get_by_text_picks_the_innermost_match() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<div class='page'><p data-testid='inner'>Loading...</p></div>")?;
    let found = win.get_by_text("Loading...")?;
    assert_eq!(win.attr(found, "data-testid").as_deref(), Some("inner"));
    Ok(())
}

#[test]
fn get_by_test_id_demands_exactly_one_match() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<i data-testid='dup'></i><i data-testid='dup'></i>")?;
    assert!(matches!(
        win.get_by_test_id("dup"),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        win.get_by_test_id("absent"),
        Err(Error::SelectorNotFound(_))
    ));
    assert_eq!(win.get_all_by_test_id("dup")?.len(), 2);
    Ok(())
}

#[test]
fn find_text_matching_walks_in_document_order() -> Result<()> {
    let mut win = empty_window()?;
    win.set_body_html("<ul><li>2004-04-04</li><li>skip</li><li>2001-01-01</li></ul>")?;
    let dates = win.find_text_matching(r"^\d{4}-\d{2}-\d{2}$")?;
    assert_eq!(dates, vec!["2004-04-04", "2001-01-01"]);
    assert!(matches!(
        win.find_text_matching("("),
        Err(Error::Pattern(_))
    ));
    Ok(())
}
