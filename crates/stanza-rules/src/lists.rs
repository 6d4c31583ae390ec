//! Collection of every statement list in a program.

use stanza_ast::ast::{Block, SwitchCase};
use stanza_ast::visit::{walk_block, walk_program, walk_switch_case};
use stanza_ast::{Program, Stmt, Visit};

/// Returns the program body, every block body (functions, control flow,
/// namespaces, class static blocks) and every `case` consequent.
pub(crate) fn statement_lists(program: &Program) -> Vec<&[Stmt]> {
    let mut collector = ListCollector { lists: Vec::new() };
    collector.visit_program(program);
    collector.lists
}

struct ListCollector<'ast> {
    lists: Vec<&'ast [Stmt]>,
}

impl<'ast> Visit<'ast> for ListCollector<'ast> {
    fn visit_program(&mut self, program: &'ast Program) {
        self.lists.push(&program.body);
        walk_program(self, program);
    }

    fn visit_block(&mut self, block: &'ast Block) {
        self.lists.push(&block.body);
        walk_block(self, block);
    }

    fn visit_switch_case(&mut self, case: &'ast SwitchCase) {
        self.lists.push(&case.body);
        walk_switch_case(self, case);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_ast::{parse, SourceType};

    #[test]
    fn finds_nested_lists() {
        let src = "\
function f() {
  a();
  if (x) { b(); }
}
class C {
  static { c(); }
  m() { d(); }
}
switch (y) {
  case 1:
    e();
}
namespace N { g(); }
";
        let program = parse(src, SourceType::TypeScript).expect("fixture should parse");
        let sizes: Vec<_> = statement_lists(&program).iter().map(|l| l.len()).collect();
        // program, f body, if block, static block, method body, case, namespace
        assert_eq!(sizes, vec![4, 2, 1, 1, 1, 1, 1]);
    }
}
