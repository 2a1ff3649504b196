macro_rules! define_rules {
    ($($name: ident => $to: ident, )*) => {
        #[derive(Debug, Copy, Clone)]
        pub enum RuleDispatcher {
            $(
                $name($to),
            )*
        }

        impl DecisionRule for RuleDispatcher {
            fn name(&self) -> &'static str {
                match self {
                    $(
                        RuleDispatcher::$name(rule) => rule.name(),
                    )*
                }
            }

            fn decide(&self, readings: &FrameReadings, context: &DecisionContext) -> Option<Decision> {
                match self {
                    $(
                        RuleDispatcher::$name(rule) => rule.decide(readings, context),
                    )*
                }
            }
        }

        impl RuleDispatcher {
            /// Every rule, in priority order (first listed wins).
            pub fn all() -> Vec<Self> {
                vec![
                    $(
                        Self::$name($to),
                    )*
                ]
            }
        }
    };
}
