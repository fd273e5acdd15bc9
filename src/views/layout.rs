use crate::model::User;

/// The icon rail on the left. Only employees get the window and mail
/// icons; the active one is highlighted by the router after navigation.
pub fn vertical_layout(user: Option<&User>) -> String {
    let icons = match user {
        Some(user) if user.is_employee() => concat!(
            "<div class='vertical-nav-icon' id='layout-icon1' data-testid='icon-window'></div>",
            "<div class='vertical-nav-icon' id='layout-icon2' data-testid='icon-mail'></div>",
        ),
        _ => "",
    };
    format!(
        "<div class='vertical-navbar' data-testid='vertical-layout'>\
           <div class='layout-title'>Billed</div>\
           {icons}\
           <div class='vertical-nav-icon' id='layout-disconnect' data-testid='layout-disconnect'></div>\
         </div>"
    )
}

pub fn loading_page() -> String {
    "<div class='loading-page' data-testid='loading-page'><p>Loading...</p></div>".to_string()
}

pub fn error_page(error: &str) -> String {
    format!(
        "<div class='error-page' data-testid='error-page'>\
           <div class='error-title'>Erreur</div>\
           <div class='error-message' data-testid='error-message'>{error}</div>\
         </div>"
    )
}
