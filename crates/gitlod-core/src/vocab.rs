//! # Vocabulary
//!
//! IRIs of the terms the entity schemas project into.
//!
//! Terms are plain `&'static str` constants; schemas wrap them with
//! [`Iri::new`](crate::Iri::new) when they are built. Nothing here is
//! validated or dereferenced.

/// RDF core vocabulary.
pub mod rdf {
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// XML Schema datatypes.
pub mod xsd {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
}

/// Friend of a Friend.
pub mod foaf {
    pub const NS: &str = "http://xmlns.com/foaf/0.1/";

    // Classes
    pub const PERSON: &str = "http://xmlns.com/foaf/0.1/Person";
    pub const ONLINE_ACCOUNT: &str = "http://xmlns.com/foaf/0.1/OnlineAccount";

    // Properties
    pub const NAME: &str = "http://xmlns.com/foaf/0.1/name";
    pub const NICK: &str = "http://xmlns.com/foaf/0.1/nick";
    pub const BASED_NEAR: &str = "http://xmlns.com/foaf/0.1/based_near";
    pub const WEBLOG: &str = "http://xmlns.com/foaf/0.1/weblog";
    pub const MBOX: &str = "http://xmlns.com/foaf/0.1/mbox";
    pub const MBOX_SHA1SUM: &str = "http://xmlns.com/foaf/0.1/mbox_sha1sum";
    pub const DEPICTION: &str = "http://xmlns.com/foaf/0.1/depiction";
    pub const ACCOUNT: &str = "http://xmlns.com/foaf/0.1/account";
    pub const ACCOUNT_NAME: &str = "http://xmlns.com/foaf/0.1/accountName";
    pub const ACCOUNT_SERVICE_HOMEPAGE: &str = "http://xmlns.com/foaf/0.1/accountServiceHomepage";
    pub const KNOWS: &str = "http://xmlns.com/foaf/0.1/knows";
    pub const PAGE: &str = "http://xmlns.com/foaf/0.1/page";
    pub const DEVELOPER: &str = "http://xmlns.com/foaf/0.1/developer";
}

/// Description of a Project.
pub mod doap {
    pub const NS: &str = "http://usefulinc.com/ns/doap#";

    // Classes
    pub const PROJECT: &str = "http://usefulinc.com/ns/doap#Project";
    pub const GIT_REPOSITORY: &str = "http://usefulinc.com/ns/doap#GitRepository";

    // Properties
    pub const NAME: &str = "http://usefulinc.com/ns/doap#name";
    pub const DESCRIPTION: &str = "http://usefulinc.com/ns/doap#description";
    pub const PROGRAMMING_LANGUAGE: &str = "http://usefulinc.com/ns/doap#programming-language";
    pub const HOMEPAGE: &str = "http://usefulinc.com/ns/doap#homepage";
    pub const WIKI: &str = "http://usefulinc.com/ns/doap#wiki";
    pub const BUG_DATABASE: &str = "http://usefulinc.com/ns/doap#bug-database";
    pub const REPOSITORY: &str = "http://usefulinc.com/ns/doap#repository";
    pub const BROWSE: &str = "http://usefulinc.com/ns/doap#browse";
}

/// Dublin Core terms.
pub mod dc {
    pub const NS: &str = "http://purl.org/dc/terms/";
    pub const CREATED: &str = "http://purl.org/dc/terms/created";
    pub const CREATOR: &str = "http://purl.org/dc/terms/creator";
    pub const TITLE: &str = "http://purl.org/dc/terms/title";
}

/// Prefixes written by the Turtle writer, in output order.
pub const STANDARD_PREFIXES: [(&str, &str); 5] = [
    ("rdf", rdf::NS),
    ("xsd", xsd::NS),
    ("foaf", foaf::NS),
    ("doap", doap::NS),
    ("dc", dc::NS),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_live_in_their_namespace() {
        assert!(foaf::KNOWS.starts_with(foaf::NS));
        assert!(doap::BUG_DATABASE.starts_with(doap::NS));
        assert!(dc::CREATOR.starts_with(dc::NS));
        assert!(rdf::TYPE.starts_with(rdf::NS));
        assert!(xsd::DATE_TIME.starts_with(xsd::NS));
    }
}
