use micro_route::ParamMap;
use serde_json::Value;

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    route: TestRoute,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, route: TestRoute) -> Self {
        Self { name, group, route }
    }

    pub fn small(name: &'static str, route: TestRoute) -> Self {
        Self::new(name, TestGroup::Small, route)
    }

    pub fn normal(name: &'static str, route: TestRoute) -> Self {
        Self::new(name, TestGroup::Normal, route)
    }

    pub fn large(name: &'static str, route: TestRoute) -> Self {
        Self::new(name, TestGroup::Large, route)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn route(&self) -> &TestRoute {
        &self.route
    }

    pub fn template(&self) -> &'static str {
        self.route.template
    }
}

/// A path template with the params used to fill it, given as a json object.
#[derive(Debug, Copy, Clone)]
pub struct TestRoute {
    template: &'static str,
    params: &'static str,
}

impl TestRoute {
    pub const fn new(template: &'static str, params: &'static str) -> Self {
        Self { template, params }
    }

    pub fn template(&self) -> &'static str {
        self.template
    }

    /// Parses the params; panics on a malformed fixture.
    pub fn params(&self) -> ParamMap {
        match serde_json::from_str(self.params) {
            Ok(Value::Object(map)) => map,
            other => panic!("params of `{}` must be a json object, got {:?}", self.template, other),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}
