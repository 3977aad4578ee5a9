use crate::cookie::SecurityToken;

/// Value the storefront template renders for `request.user` when nobody is
/// logged in.
const ANONYMOUS_TEMPLATE_USER: &str = "AnonymousUser";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionUser {
    Anonymous,
    Authenticated(String),
}

/// Session facts the client needs, handed over at construction time.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user: SessionUser,
    pub security_token: Option<SecurityToken>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self {
            user: SessionUser::Anonymous,
            security_token: None,
        }
    }

    pub fn authenticated(username: impl Into<String>, token: Option<SecurityToken>) -> Self {
        Self {
            user: SessionUser::Authenticated(username.into()),
            security_token: token,
        }
    }

    pub fn from_template_user(user: &str, token: Option<SecurityToken>) -> Self {
        let user = user.trim();
        if user.is_empty() || user == ANONYMOUS_TEMPLATE_USER {
            Self {
                user: SessionUser::Anonymous,
                security_token: token,
            }
        } else {
            Self::authenticated(user, token)
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.user, SessionUser::Authenticated(_))
    }
}
