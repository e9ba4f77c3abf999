//! Roots, preamble and class-level declarations

use super::{Converter, Elements, unexpected_element};
use crate::ast::{
    AnnotationSet, CallConstructorParent, ClassBody, ClassDeclaration, ClassParent, Declaration,
    DelegatedTypeParent, DelegationCall, EnumEntry, File, ImportAlias, ImportDirective,
    InitDeclaration, Name, PackageDirective, PrimaryConstructor, Script, SecondaryConstructor,
    Statement, TypeAliasDeclaration, TypeParent,
};
use crate::cst::{KtSyntaxKind, KtSyntaxNode};
use crate::error::KastError;
use crate::result::Result;

use KtSyntaxKind as K;

impl Converter<'_> {
    // ==================
    // Roots
    // ==================

    pub(super) fn file(&mut self, node: &KtSyntaxNode) -> Result<File> {
        self.open();
        let mut elements = Elements::new(node);
        let annotation_sets = self.file_annotations(&mut elements)?;
        let package_directive = self.package_directive_opt(&mut elements)?;
        let import_directives = self.import_directives(&mut elements)?;

        let mut declarations = Vec::new();
        while let Some(child) = elements.any_node() {
            declarations.push(self.declaration(&child)?);
        }
        elements.finish()?;

        let extras = self.close();
        let file = File {
            annotation_sets,
            package_directive,
            import_directives,
            declarations,
            extras,
        };
        Ok(self.created(file, node.clone()))
    }

    pub(super) fn script(&mut self, node: &KtSyntaxNode) -> Result<Script> {
        self.open();
        let mut elements = Elements::new(node);
        let annotation_sets = self.file_annotations(&mut elements)?;
        let package_directive = self.package_directive_opt(&mut elements)?;
        let import_directives = self.import_directives(&mut elements)?;

        let mut statements = Vec::new();
        while let Some(child) = elements.any_node() {
            statements.push(self.statement(&child)?);
        }
        elements.finish()?;

        let extras = self.close();
        let script = Script {
            annotation_sets,
            package_directive,
            import_directives,
            statements,
            extras,
        };
        Ok(self.created(script, node.clone()))
    }

    fn file_annotations(&mut self, elements: &mut Elements) -> Result<Vec<AnnotationSet>> {
        let Some(list) = elements.node(K::FileAnnotationList) else {
            return Ok(Vec::new());
        };
        let mut inner = Elements::new(&list);
        let mut sets = Vec::new();
        while let Some(set) = inner.node(K::AnnotationSet) {
            sets.push(self.annotation_set(&set)?);
        }
        inner.finish()?;
        Ok(sets)
    }

    fn package_directive_opt(&mut self, elements: &mut Elements) -> Result<Option<PackageDirective>> {
        let Some(node) = elements.node(K::PackageDirective) else {
            return Ok(None);
        };
        let mut inner = Elements::new(&node);
        if inner.at(K::ModifierList) {
            return Err(KastError::unsupported("package directive with modifiers"));
        }

        self.open();
        let keyword = inner.expect_token(K::PackageKw)?;
        self.own(&keyword)?;
        let mut names = Vec::new();
        let qualified = inner.expect_any_node()?;
        self.qualified_name(&qualified, &mut names)?;
        inner.finish()?;

        let extras = self.close();
        Ok(Some(self.created(PackageDirective { names, extras }, node)))
    }

    fn import_directives(&mut self, elements: &mut Elements) -> Result<Vec<ImportDirective>> {
        let Some(list) = elements.node(K::ImportList) else {
            return Ok(Vec::new());
        };
        let mut inner = Elements::new(&list);
        let mut imports = Vec::new();
        while let Some(node) = inner.node(K::ImportDirective) {
            imports.push(self.import_directive(&node)?);
        }
        inner.finish()?;
        Ok(imports)
    }

    fn import_directive(&mut self, node: &KtSyntaxNode) -> Result<ImportDirective> {
        self.open();
        let mut elements = Elements::new(node);
        let keyword = elements.expect_token(K::SoftKw)?;
        self.own(&keyword)?;

        let mut names = Vec::new();
        let qualified = elements.expect_any_node()?;
        self.qualified_name(&qualified, &mut names)?;

        let wildcard = match elements.token(K::Dot) {
            Some(dot) => {
                self.own(&dot)?;
                let star = elements.expect_token(K::Star)?;
                self.own(&star)?;
                true
            }
            None => false,
        };

        let alias = match elements.node(K::ImportAlias) {
            Some(alias) => {
                self.open();
                let mut inner = Elements::new(&alias);
                let as_keyword = inner.expect_token(K::AsKw)?;
                self.own(&as_keyword)?;
                let ident = inner.expect_token(K::Ident)?;
                let name = self.name(&ident)?;
                inner.finish()?;
                let extras = self.close();
                Some(self.created(ImportAlias { name, extras }, alias))
            }
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let import = ImportDirective {
            names,
            wildcard,
            alias,
            extras,
        };
        Ok(self.created(import, node.clone()))
    }

    /// Flatten `a.b.c` into names; the dots belong to the enclosing node
    fn qualified_name(&mut self, node: &KtSyntaxNode, names: &mut Vec<Name>) -> Result<()> {
        let mut elements = Elements::new(node);
        match node.kind() {
            K::ReferenceExpression => {
                let ident = elements.expect_token(K::Ident)?;
                names.push(self.name(&ident)?);
            }
            K::DotQualifiedExpression => {
                let qualifier = elements.expect_any_node()?;
                self.qualified_name(&qualifier, names)?;
                let dot = elements.expect_token(K::Dot)?;
                self.own(&dot)?;
                let selector = elements.expect_node(K::ReferenceExpression)?;
                self.qualified_name(&selector, names)?;
            }
            _ => return Err(unexpected_element(K::PackageDirective, &node.clone().into())),
        }
        elements.finish()
    }

    // ==================
    // Declarations
    // ==================

    pub(super) fn statement(&mut self, node: &KtSyntaxNode) -> Result<Statement> {
        match node.kind() {
            K::Class | K::ObjectDeclaration | K::Fun | K::Property | K::Typealias => {
                Ok(Statement::Declaration(self.declaration(node)?))
            }
            _ => Ok(Statement::Expression(self.expression(node)?)),
        }
    }

    pub(super) fn declaration(&mut self, node: &KtSyntaxNode) -> Result<Declaration> {
        let declaration = match node.kind() {
            K::Class | K::ObjectDeclaration => Declaration::Class(self.class(node)?),
            K::Fun => Declaration::Function(self.function(node)?),
            K::Property => Declaration::Property(self.property(node)?),
            K::Typealias => Declaration::TypeAlias(self.type_alias(node)?),
            K::SecondaryConstructor => {
                Declaration::SecondaryConstructor(self.secondary_constructor(node)?)
            }
            K::ClassInitializer => Declaration::Init(self.init(node)?),
            _ => {
                return Err(KastError::unsupported(format!(
                    "unsupported syntax: {} is not a declaration",
                    node.kind()
                )));
            }
        };
        Ok(declaration)
    }

    /// Classes, interfaces and object declarations
    pub(super) fn class(&mut self, node: &KtSyntaxNode) -> Result<ClassDeclaration> {
        self.open();
        let mut elements = Elements::new(node);
        let modifiers = self.modifiers(&mut elements)?;
        let keyword = elements
            .token(K::ClassKw)
            .or_else(|| elements.token(K::InterfaceKw))
            .or_else(|| elements.token(K::ObjectKw))
            .ok_or_else(|| elements.unexpected("'class', 'interface' or 'object'"))?;
        let declaration_keyword = self.keyword(&keyword)?;
        let name = match elements.token(K::Ident) {
            Some(ident) => Some(self.name(&ident)?),
            None => None,
        };
        let type_params = self.type_params_opt(&mut elements)?;
        let primary_constructor = match elements.node(K::PrimaryConstructor) {
            Some(constructor) => Some(self.primary_constructor(&constructor)?),
            None => None,
        };
        let parents = match elements.node(K::SuperTypeList) {
            Some(list) => {
                let mut inner = Elements::new(&list);
                let parents = self.comma_list(
                    &mut inner,
                    Some(":"),
                    None,
                    |kind| {
                        matches!(
                            kind,
                            K::SuperTypeCallEntry | K::DelegatedSuperTypeEntry | K::SuperTypeEntry
                        )
                    },
                    |c, entry| c.class_parent(entry),
                )?;
                inner.finish()?;
                Some(parents)
            }
            None => None,
        };
        let type_constraint_set = match elements.node(K::TypeConstraintList) {
            Some(list) => Some(self.type_constraint_set(&list)?),
            None => None,
        };
        let body = match elements.node(K::ClassBody) {
            Some(body) => Some(self.class_body(&body)?),
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let class = ClassDeclaration {
            modifiers,
            declaration_keyword,
            name,
            type_params,
            primary_constructor,
            parents,
            type_constraint_set,
            body,
            extras,
        };
        Ok(self.created(class, node.clone()))
    }

    fn primary_constructor(&mut self, node: &KtSyntaxNode) -> Result<PrimaryConstructor> {
        self.open();
        let mut elements = Elements::new(node);
        let modifiers = self.modifiers(&mut elements)?;
        let constructor_keyword = match elements.token(K::SoftKw) {
            Some(keyword) => {
                self.own(&keyword)?;
                true
            }
            None => false,
        };
        let list = elements.expect_node(K::ValueParameterList)?;
        let params = self.function_params(&list)?;
        elements.finish()?;

        let extras = self.close();
        let constructor = PrimaryConstructor {
            modifiers,
            constructor_keyword,
            params,
            extras,
        };
        Ok(self.created(constructor, node.clone()))
    }

    fn class_parent(&mut self, node: &KtSyntaxNode) -> Result<ClassParent> {
        self.open();
        let mut elements = Elements::new(node);
        let parent = match node.kind() {
            K::SuperTypeCallEntry => {
                let callee = elements.expect_node(K::ConstructorCallee)?;
                let callee = self.constructor_callee(&callee)?;
                let list = elements.expect_node(K::ValueArgumentList)?;
                let args = self.value_arguments(&list)?;
                elements.finish()?;
                let extras = self.close();
                let parent = CallConstructorParent {
                    callee,
                    args,
                    extras,
                };
                ClassParent::CallConstructor(self.created(parent, node.clone()))
            }
            K::DelegatedSuperTypeEntry => {
                let type_ref = elements.expect_node(K::TypeReference)?;
                let type_ref = self.type_ref(&type_ref)?;
                let by = elements.expect_token(K::SoftKw)?;
                self.own(&by)?;
                let expression = elements.expect_any_node()?;
                let expression = Box::new(self.expression(&expression)?);
                elements.finish()?;
                let extras = self.close();
                let parent = DelegatedTypeParent {
                    type_ref,
                    expression,
                    extras,
                };
                ClassParent::DelegatedType(self.created(parent, node.clone()))
            }
            _ => {
                let type_ref = elements.expect_node(K::TypeReference)?;
                let type_ref = self.type_ref(&type_ref)?;
                elements.finish()?;
                let extras = self.close();
                ClassParent::Type(self.created(TypeParent { type_ref, extras }, node.clone()))
            }
        };
        Ok(parent)
    }

    pub(super) fn class_body(&mut self, node: &KtSyntaxNode) -> Result<ClassBody> {
        self.open();
        let mut elements = Elements::new(node);
        let open = elements.expect_token(K::LBrace)?;
        self.own(&open)?;

        let enum_entries = if elements.at(K::EnumEntry) {
            Some(self.comma_list(
                &mut elements,
                None,
                None,
                |kind| kind == K::EnumEntry,
                |c, entry| c.enum_entry(entry),
            )?)
        } else {
            None
        };

        let mut declarations = Vec::new();
        while let Some(child) = elements.any_node() {
            declarations.push(self.declaration(&child)?);
        }
        let close = elements.expect_token(K::RBrace)?;
        self.own(&close)?;
        elements.finish()?;

        let extras = self.close();
        let body = ClassBody {
            enum_entries,
            declarations,
            extras,
        };
        Ok(self.created(body, node.clone()))
    }

    fn enum_entry(&mut self, node: &KtSyntaxNode) -> Result<EnumEntry> {
        self.open();
        let mut elements = Elements::new(node);
        let modifiers = self.modifiers(&mut elements)?;
        let ident = elements.expect_token(K::Ident)?;
        let name = self.name(&ident)?;
        let args = match elements.node(K::ValueArgumentList) {
            Some(list) => Some(self.value_arguments(&list)?),
            None => None,
        };
        let body = match elements.node(K::ClassBody) {
            Some(body) => Some(self.class_body(&body)?),
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let entry = EnumEntry {
            modifiers,
            name,
            args,
            body,
            extras,
        };
        Ok(self.created(entry, node.clone()))
    }

    fn init(&mut self, node: &KtSyntaxNode) -> Result<InitDeclaration> {
        let mut elements = Elements::new(node);
        if elements.at(K::ModifierList) {
            return Err(KastError::unsupported(
                "unsupported syntax: modifiers on an initializer block",
            ));
        }
        self.open();
        let keyword = elements.expect_token(K::SoftKw)?;
        self.own(&keyword)?;
        let block = elements.expect_node(K::Block)?;
        let block = self.block(&block)?;
        elements.finish()?;

        let extras = self.close();
        Ok(self.created(InitDeclaration { block, extras }, node.clone()))
    }

    fn secondary_constructor(&mut self, node: &KtSyntaxNode) -> Result<SecondaryConstructor> {
        self.open();
        let mut elements = Elements::new(node);
        let modifiers = self.modifiers(&mut elements)?;
        let keyword = elements.expect_token(K::SoftKw)?;
        self.own(&keyword)?;
        let list = elements.expect_node(K::ValueParameterList)?;
        let params = self.function_params(&list)?;

        let delegation_call = match elements.token(K::Colon) {
            Some(colon) => {
                self.own(&colon)?;
                let call = elements.expect_node(K::ConstructorDelegationCall)?;
                self.open();
                let mut inner = Elements::new(&call);
                let target = inner
                    .token(K::ThisKw)
                    .or_else(|| inner.token(K::SuperKw))
                    .ok_or_else(|| inner.unexpected("'this' or 'super'"))?;
                let target = self.keyword(&target)?;
                let list = inner.expect_node(K::ValueArgumentList)?;
                let args = self.value_arguments(&list)?;
                inner.finish()?;
                let extras = self.close();
                Some(self.created(DelegationCall { target, args, extras }, call))
            }
            None => None,
        };
        let block = match elements.node(K::Block) {
            Some(block) => Some(self.block(&block)?),
            None => None,
        };
        elements.finish()?;

        let extras = self.close();
        let constructor = SecondaryConstructor {
            modifiers,
            params,
            delegation_call,
            block,
            extras,
        };
        Ok(self.created(constructor, node.clone()))
    }

    fn type_alias(&mut self, node: &KtSyntaxNode) -> Result<TypeAliasDeclaration> {
        self.open();
        let mut elements = Elements::new(node);
        let modifiers = self.modifiers(&mut elements)?;
        let keyword = elements.expect_token(K::TypealiasKw)?;
        self.own(&keyword)?;
        let ident = elements.expect_token(K::Ident)?;
        let name = self.name(&ident)?;
        let type_params = self.type_params_opt(&mut elements)?;
        let eq = elements.expect_token(K::Eq)?;
        self.own(&eq)?;
        let type_ref = elements.expect_node(K::TypeReference)?;
        let type_ref = self.type_ref(&type_ref)?;
        elements.finish()?;

        let extras = self.close();
        let alias = TypeAliasDeclaration {
            modifiers,
            name,
            type_params,
            type_ref,
            extras,
        };
        Ok(self.created(alias, node.clone()))
    }
}
