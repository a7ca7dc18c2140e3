use uuid::Uuid;

use crate::{models::posts::Post, Error, Result};

/// Operations on the post collection, as dispatched by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostAction {
    List,
    Create,
    Retrieve,
    Update,
    PartialUpdate,
    Delete,
    ListOwn,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Any non-anonymous identity.
    Authenticated,
    /// Only the identity that wrote the post.
    PostAuthor,
}

impl PostAction {
    pub fn permission(self) -> Permission {
        match self {
            Self::Update | Self::PartialUpdate | Self::Delete => Permission::PostAuthor,
            Self::List | Self::Create | Self::Retrieve | Self::ListOwn | Self::Search => {
                Permission::Authenticated
            }
        }
    }
}

/// Decides whether `identity` may run `action`, optionally against `post`.
///
/// Author-only actions need the target post; without it the post is
/// reported as missing.
pub fn authorize(action: PostAction, identity: Option<Uuid>, post: Option<&Post>) -> Result<()> {
    let identity = identity.ok_or(Error::Unauthorized)?;

    match action.permission() {
        Permission::Authenticated => Ok(()),
        Permission::PostAuthor => match post {
            Some(post) if post.author == identity => Ok(()),
            Some(_) => Err(Error::Forbidden),
            None => Err(Error::NotFound),
        },
    }
}
