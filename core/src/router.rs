// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Route table of the application with a login guard.
//!
//! Every navigation passes [`Router::before_each`]: without stored credentials
//! any target other than `/login` is redirected to `/login`. The guard only
//! checks that credentials exist; it never checks whether they have expired.

use std::fmt;

use isyourday_client::Session;

/// Path of the login page, the only page reachable without credentials.
pub const LOGIN_PATH: &str = "/login";

const MAX_REDIRECTS: usize = 8;

/// A page of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    /// Shell around the pages below `/`.
    Layout,
    /// Virtual user management.
    User,
    /// Events of virtual users.
    Event,
    /// Workflows.
    Workflow,
    /// Compose and send emails.
    SendEmail,
    /// File uploads.
    UploadFile,
    /// Email history.
    MailHistory,
    /// Login form.
    Login,
    /// No route matches.
    NotFound,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Layout => "layout",
            Self::User => "user",
            Self::Event => "event",
            Self::Workflow => "workflow",
            Self::SendEmail => "send email",
            Self::UploadFile => "upload file",
            Self::MailHistory => "mail history",
            Self::Login => "login",
            Self::NotFound => "not found",
        };
        f.write_str(name)
    }
}

/// One entry of the route table.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    /// Absolute for top-level routes, relative to the parent for children.
    pub path: &'static str,
    /// The page shown, absent for pure redirects.
    pub view: Option<View>,
    /// Target to redirect to, relative targets resolve against the parent.
    pub redirect: Option<&'static str>,
    /// Nested routes.
    pub children: &'static [Route],
}

impl Route {
    const fn view(path: &'static str, view: View) -> Self {
        Self {
            path,
            view: Some(view),
            redirect: None,
            children: &[],
        }
    }

    const fn redirect(path: &'static str, to: &'static str) -> Self {
        Self {
            path,
            view: None,
            redirect: Some(to),
            children: &[],
        }
    }
}

/// The application's route table.
pub const ROUTES: &[Route] = &[
    Route {
        path: "/",
        view: Some(View::Layout),
        redirect: None,
        children: &[
            Route::view("user", View::User),
            Route::view("event", View::Event),
            Route::view("workflow", View::Workflow),
            Route::view("sendemail", View::SendEmail),
            Route::view("uploadFile", View::UploadFile),
            Route::view("mailhistory", View::MailHistory),
            Route::redirect("", "user"),
        ],
    },
    Route::view(LOGIN_PATH, View::Login),
];

/// Decision of the navigation guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    /// Navigation continues to the requested target.
    Proceed,
    /// Navigation is sent elsewhere.
    Redirect(String),
}

/// Outcome of a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// The final path after guard and table redirects.
    pub path: String,
    /// The page shown at that path.
    pub view: View,
}

/// Resolves navigation targets against [`ROUTES`] under the login guard.
#[derive(Debug, Clone)]
pub struct Router {
    routes: &'static [Route],
    session: Session,
}

impl Router {
    /// Creates a router reading credentials from `session`.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            routes: ROUTES,
            session,
        }
    }

    /// The guard run before every navigation.
    #[must_use]
    pub fn before_each(&self, to: &str) -> Guard {
        if normalize(to) != LOGIN_PATH && !self.session.is_authenticated() {
            tracing::debug!(to, "not logged in, redirecting to login");
            Guard::Redirect(LOGIN_PATH.to_string())
        } else {
            Guard::Proceed
        }
    }

    /// Navigates to `to`: runs the guard, then follows table redirects.
    #[must_use]
    pub fn navigate(&self, to: &str) -> Navigation {
        let target = match self.before_each(to) {
            Guard::Proceed => normalize(to),
            Guard::Redirect(path) => path,
        };
        self.resolve(&target)
    }

    /// Maps a path to its page, following redirects of the table.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Navigation {
        let mut path = normalize(path);
        for _ in 0..MAX_REDIRECTS {
            match find(self.routes, "", &path) {
                Some(Match::View(view)) => return Navigation { path, view },
                Some(Match::Redirect(to)) => {
                    tracing::debug!(from = %path, %to, "following redirect");
                    path = to;
                }
                None => break,
            }
        }

        Navigation {
            path,
            view: View::NotFound,
        }
    }
}

enum Match {
    View(View),
    Redirect(String),
}

fn find(routes: &[Route], parent: &str, path: &str) -> Option<Match> {
    for route in routes {
        let full = join(parent, route.path);
        if !route.children.is_empty() {
            if let Some(found) = find(route.children, &full, path) {
                return Some(found);
            }
        }

        if full == path {
            if let Some(to) = route.redirect {
                let to = if to.starts_with('/') {
                    to.to_string()
                } else {
                    join(parent, to)
                };
                return Some(Match::Redirect(to));
            }
            // A parent without a view of its own only matches through its children.
            if let Some(view) = route.view {
                return Some(Match::View(view));
            }
        }
    }
    None
}

fn join(parent: &str, path: &str) -> String {
    if path.starts_with('/') {
        normalize(path)
    } else {
        normalize(&format!("{}/{path}", parent.trim_end_matches('/')))
    }
}

/// Drops query, fragment, duplicate and trailing slashes.
fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').filter(|a| !a.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use isyourday_client::Token;

    use super::*;

    fn logged_in() -> Session {
        let session = Session::in_memory();
        session
            .store_token(&Token {
                access_token: "abc".to_string(),
                token_type: "bearer".to_string(),
            })
            .unwrap();
        session
    }

    #[test]
    fn guard_redirects_to_login_without_credentials() {
        let router = Router::new(Session::in_memory());
        for to in ["/", "/user", "/event", "/mailhistory", "/unknown"] {
            assert_eq!(
                router.before_each(to),
                Guard::Redirect(LOGIN_PATH.to_string()),
                "{to}"
            );
        }
        assert_eq!(router.before_each("/login"), Guard::Proceed);
    }

    #[test]
    fn guard_requires_both_fields() {
        let session = Session::in_memory();
        session
            .store_token(&Token {
                access_token: "abc".to_string(),
                token_type: String::new(),
            })
            .unwrap();
        let router = Router::new(session);
        assert_eq!(
            router.before_each("/user"),
            Guard::Redirect(LOGIN_PATH.to_string())
        );
    }

    #[test]
    fn guard_allows_navigation_when_logged_in() {
        let router = Router::new(logged_in());
        assert_eq!(router.before_each("/user"), Guard::Proceed);
        assert_eq!(router.before_each("/login"), Guard::Proceed);
    }

    #[test]
    fn navigate_without_credentials_lands_on_login() {
        let router = Router::new(Session::in_memory());
        let nav = router.navigate("/sendemail");
        assert_eq!(nav.path, "/login");
        assert_eq!(nav.view, View::Login);
    }

    #[test]
    fn root_redirects_to_user() {
        let router = Router::new(logged_in());
        let nav = router.navigate("/");
        assert_eq!(nav.path, "/user");
        assert_eq!(nav.view, View::User);
    }

    #[test]
    fn resolves_child_routes() {
        let router = Router::new(logged_in());
        let cases = [
            ("/user", View::User),
            ("/event/", View::Event),
            ("/workflow", View::Workflow),
            ("/sendemail?draft=1", View::SendEmail),
            ("/uploadFile", View::UploadFile),
            ("//mailhistory", View::MailHistory),
        ];
        for (path, view) in cases {
            assert_eq!(router.navigate(path).view, view, "{path}");
        }
    }

    #[test]
    fn unknown_path_is_not_found() {
        let router = Router::new(logged_in());
        let nav = router.navigate("/settings");
        assert_eq!(nav.path, "/settings");
        assert_eq!(nav.view, View::NotFound);
    }
}
