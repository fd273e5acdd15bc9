use tracing::debug;

use crate::containers;
use crate::page::Window;
use crate::views::bills::{BillsViewState, bills_ui};
use crate::views::new_bill::new_bill_ui;
use crate::{Error, Result};

/// Logical page names and their location fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutePath {
    Login,
    Bills,
    NewBill,
}

impl RoutePath {
    pub fn pathname(&self) -> &'static str {
        match self {
            Self::Login => "/",
            Self::Bills => "#employee/bills",
            Self::NewBill => "#employee/bill/new",
        }
    }

    pub fn from_pathname(pathname: &str) -> Result<Self> {
        match pathname {
            "/" => Ok(Self::Login),
            "#employee/bills" => Ok(Self::Bills),
            "#employee/bill/new" => Ok(Self::NewBill),
            other => Err(Error::UnknownRoute(other.to_string())),
        }
    }
}

fn login_ui() -> String {
    "<div class='login-page' data-testid='login-page'>\
       <div class='login-title'>Billed</div>\
     </div>"
        .to_string()
}

/// Static markup for a route, the route-table view of the application.
/// The bills route renders its empty-data shape; the fetch lifecycle that
/// fills it lives in [`Window::navigate`].
pub fn routes(route: RoutePath, win: &Window) -> Result<String> {
    let user = win.storage().user()?;
    Ok(match route {
        RoutePath::Login => login_ui(),
        RoutePath::Bills => bills_ui(&BillsViewState {
            user: user.as_ref(),
            ..Default::default()
        }),
        RoutePath::NewBill => new_bill_ui(user.as_ref()),
    })
}

fn highlight_icons(win: &mut Window, route: RoutePath) -> Result<()> {
    let window_icon = win.select_all("[data-testid='icon-window']")?;
    let mail_icon = win.select_all("[data-testid='icon-mail']")?;
    for icon in window_icon {
        match route {
            RoutePath::Bills => win.add_class(icon, "active-icon")?,
            _ => win.remove_class(icon, "active-icon")?,
        }
    }
    for icon in mail_icon {
        match route {
            RoutePath::NewBill => win.add_class(icon, "active-icon")?,
            _ => win.remove_class(icon, "active-icon")?,
        }
    }
    Ok(())
}

impl Window {
    /// The navigation entry the containers call. Renders the target page,
    /// wires its container and, for the bills list, enqueues the fetch
    /// whose completion re-renders with data or with the error page.
    pub fn navigate(&mut self, route: RoutePath) -> Result<()> {
        debug!(pathname = route.pathname(), "navigate");
        self.set_route(route);
        match route {
            RoutePath::Login => {
                let markup = login_ui();
                self.set_body_html(&markup)
            }
            RoutePath::NewBill => {
                let user = self.storage().user()?;
                let markup = new_bill_ui(user.as_ref());
                self.set_body_html(&markup)?;
                highlight_icons(self, route)?;
                containers::new_bill::install(self)
            }
            RoutePath::Bills => {
                let user = self.storage().user()?;
                let markup = bills_ui(&BillsViewState {
                    loading: true,
                    user: user.as_ref(),
                    ..Default::default()
                });
                self.set_body_html(&markup)?;
                self.enqueue(Box::new(|win| {
                    // Delivered even if the user navigated away meanwhile;
                    // in-flight requests are not aborted.
                    let store = win.store();
                    let user = win.storage().user()?;
                    match store.list() {
                        Ok(bills) => {
                            let bills = containers::bills::format_bills(bills);
                            let markup = bills_ui(&BillsViewState {
                                data: &bills,
                                user: user.as_ref(),
                                ..Default::default()
                            });
                            win.set_body_html(&markup)?;
                            highlight_icons(win, RoutePath::Bills)?;
                            containers::bills::install(win)
                        }
                        Err(err) => {
                            debug!(%err, "bills fetch failed");
                            let message = err.to_string();
                            let markup = bills_ui(&BillsViewState {
                                error: Some(&message),
                                user: user.as_ref(),
                                ..Default::default()
                            });
                            win.set_body_html(&markup)
                        }
                    }
                }));
                Ok(())
            }
        }
    }
}
