//! Object-level access rules.
//!
//! A [`Permission`] decides whether a requester may perform an [`Access`] on
//! an object. Reads are public under both rules; writes differ.

use super::auth::Principal;
use super::error::Error;
use super::ids::UserId;

/// Kind of operation being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// Access rule evaluated against an optional requester.
pub trait Permission {
    /// Ok when allowed; `Unauthorized` for anonymous writers, `Forbidden`
    /// for authenticated requesters lacking the right.
    fn check(&self, requester: Option<&Principal>, access: Access) -> Result<(), Error>;
}

/// Writes require the requester to be the object's author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsAuthorOrReadOnly {
    pub author: UserId,
}

impl Permission for IsAuthorOrReadOnly {
    fn check(&self, requester: Option<&Principal>, access: Access) -> Result<(), Error> {
        if access == Access::Read {
            return Ok(());
        }
        match requester {
            None => Err(Error::unauthorized("authentication required")),
            Some(principal) if principal.id == self.author => Ok(()),
            Some(_) => Err(Error::forbidden("only the author may modify this recipe")),
        }
    }
}

/// Writes require a superuser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IsAdminOrReadOnly;

impl Permission for IsAdminOrReadOnly {
    fn check(&self, requester: Option<&Principal>, access: Access) -> Result<(), Error> {
        if access == Access::Read {
            return Ok(());
        }
        match requester {
            None => Err(Error::unauthorized("authentication required")),
            Some(principal) if principal.is_superuser => Ok(()),
            Some(_) => Err(Error::forbidden("administrator rights required")),
        }
    }
}

/// Require an authenticated requester.
pub fn require_principal(requester: Option<&Principal>) -> Result<&Principal, Error> {
    requester.ok_or_else(|| Error::unauthorized("authentication required"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    const AUTHOR: UserId = UserId::new(1);
    const OTHER: UserId = UserId::new(2);

    fn outcome(result: Result<(), Error>) -> Option<ErrorCode> {
        result.err().map(|err| err.code())
    }

    #[rstest]
    #[case(None, Access::Read, None)]
    #[case(Some(Principal::user(OTHER)), Access::Read, None)]
    #[case(None, Access::Write, Some(ErrorCode::Unauthorized))]
    #[case(Some(Principal::user(OTHER)), Access::Write, Some(ErrorCode::Forbidden))]
    #[case(Some(Principal::superuser(OTHER)), Access::Write, Some(ErrorCode::Forbidden))]
    #[case(Some(Principal::user(AUTHOR)), Access::Write, None)]
    fn author_rule(
        #[case] requester: Option<Principal>,
        #[case] access: Access,
        #[case] expected: Option<ErrorCode>,
    ) {
        let rule = IsAuthorOrReadOnly { author: AUTHOR };
        assert_eq!(outcome(rule.check(requester.as_ref(), access)), expected);
    }

    #[rstest]
    #[case(None, Access::Read, None)]
    #[case(None, Access::Write, Some(ErrorCode::Unauthorized))]
    #[case(Some(Principal::user(OTHER)), Access::Write, Some(ErrorCode::Forbidden))]
    #[case(Some(Principal::superuser(OTHER)), Access::Write, None)]
    fn admin_rule(
        #[case] requester: Option<Principal>,
        #[case] access: Access,
        #[case] expected: Option<ErrorCode>,
    ) {
        assert_eq!(
            outcome(IsAdminOrReadOnly.check(requester.as_ref(), access)),
            expected
        );
    }
}
