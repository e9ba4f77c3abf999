//! Roots, preamble and declarations

use super::WriteContext;
use crate::ast::{
    Accessor, AnnotationSet, CallConstructorParent, ClassBody, ClassDeclaration, ClassParent,
    CommaSeparatedNodeList, Declaration, DelegatedTypeParent, DelegationCall, EnumEntry,
    ExpressionBody, File, FunctionBody, FunctionDeclaration, FunctionParam, Getter, ImportAlias,
    ImportDirective, InitDeclaration, MultiVariable, PackageDirective, PrimaryConstructor,
    PropertyDeclaration, PropertyDelegate, Script, SecondaryConstructor, Setter, SingleVariable,
    Statement, TypeAliasDeclaration, TypeParent, TypeRef, Variable,
};

impl<'a> WriteContext<'a> {
    // ==================
    // Roots
    // ==================

    pub(super) fn file(&mut self, file: &'a File) {
        self.node(&file.extras, |w| {
            w.preamble(
                &file.annotation_sets,
                file.package_directive.as_ref(),
                &file.import_directives,
            );
            for declaration in &file.declarations {
                w.section();
                w.declaration(declaration);
            }
            w.end_of_file();
        });
    }

    pub(super) fn script(&mut self, script: &'a Script) {
        self.node(&script.extras, |w| {
            w.preamble(
                &script.annotation_sets,
                script.package_directive.as_ref(),
                &script.import_directives,
            );
            for (index, statement) in script.statements.iter().enumerate() {
                if index == 0 {
                    w.section();
                } else {
                    w.newline();
                }
                w.statement(statement);
            }
            w.end_of_file();
        });
    }

    fn preamble(
        &mut self,
        annotation_sets: &'a [AnnotationSet],
        package_directive: Option<&'a PackageDirective>,
        import_directives: &'a [ImportDirective],
    ) {
        for set in annotation_sets {
            self.annotation_set(set);
            self.newline();
        }
        if let Some(package) = package_directive {
            self.section();
            self.package_directive(package);
        }
        for (index, import) in import_directives.iter().enumerate() {
            if index == 0 {
                self.section();
            } else {
                self.newline();
            }
            self.import_directive(import);
        }
    }

    /// Blank line between top-level groups
    fn section(&mut self) {
        if !self.output.trim_end().is_empty() {
            self.blank_line();
        }
    }

    fn end_of_file(&mut self) {
        if !self.lossless && !self.output.is_empty() && !self.output.ends_with('\n') {
            self.output.push('\n');
        }
    }

    pub(super) fn package_directive(&mut self, package: &'a PackageDirective) {
        self.node(&package.extras, |w| {
            w.token("package");
            w.space();
            for (index, name) in package.names.iter().enumerate() {
                if index > 0 {
                    w.token(".");
                }
                w.name(name);
            }
        });
    }

    pub(super) fn import_directive(&mut self, import: &'a ImportDirective) {
        self.node(&import.extras, |w| {
            w.token("import");
            w.space();
            for (index, name) in import.names.iter().enumerate() {
                if index > 0 {
                    w.token(".");
                }
                w.name(name);
            }
            if import.wildcard {
                w.token(".");
                w.token("*");
            }
            if let Some(alias) = &import.alias {
                w.space();
                w.import_alias(alias);
            }
        });
    }

    pub(super) fn import_alias(&mut self, alias: &'a ImportAlias) {
        self.node(&alias.extras, |w| {
            w.token("as");
            w.space();
            w.name(&alias.name);
        });
    }

    // ==================
    // Declarations
    // ==================

    pub(super) fn statement(&mut self, statement: &'a Statement) {
        match statement {
            Statement::Declaration(declaration) => self.declaration(declaration),
            Statement::Expression(expression) => self.expression(expression),
        }
    }

    pub(super) fn declaration(&mut self, declaration: &'a Declaration) {
        match declaration {
            Declaration::Class(class) => self.class(class),
            Declaration::Function(function) => self.function(function),
            Declaration::Property(property) => self.property(property),
            Declaration::TypeAlias(alias) => self.type_alias(alias),
            Declaration::SecondaryConstructor(constructor) => {
                self.secondary_constructor(constructor)
            }
            Declaration::Init(init) => self.init(init),
        }
    }

    pub(super) fn class(&mut self, class: &'a ClassDeclaration) {
        self.node(&class.extras, |w| {
            w.modifiers(&class.modifiers);
            w.keyword(&class.declaration_keyword);
            if let Some(name) = &class.name {
                w.space();
                w.name(name);
            }
            if let Some(type_params) = &class.type_params {
                w.comma_list(type_params, Self::type_param);
            }
            if let Some(constructor) = &class.primary_constructor {
                if constructor.constructor_keyword || !constructor.modifiers.is_empty() {
                    w.space();
                }
                w.primary_constructor(constructor);
            }
            if let Some(parents) = &class.parents {
                w.space();
                w.comma_list(parents, Self::class_parent);
            }
            if let Some(constraints) = &class.type_constraint_set {
                w.space();
                w.type_constraint_set(constraints);
            }
            if let Some(body) = &class.body {
                w.space();
                w.class_body(body);
            }
        });
    }

    pub(super) fn primary_constructor(&mut self, constructor: &'a PrimaryConstructor) {
        self.node(&constructor.extras, |w| {
            w.modifiers(&constructor.modifiers);
            if constructor.constructor_keyword {
                w.token("constructor");
            }
            w.comma_list(&constructor.params, Self::function_param);
        });
    }

    fn class_parent(&mut self, parent: &'a ClassParent) {
        match parent {
            ClassParent::CallConstructor(parent) => self.call_constructor_parent(parent),
            ClassParent::DelegatedType(parent) => self.delegated_type_parent(parent),
            ClassParent::Type(parent) => self.type_parent(parent),
        }
    }

    pub(super) fn call_constructor_parent(&mut self, parent: &'a CallConstructorParent) {
        self.node(&parent.extras, |w| {
            w.constructor_callee(&parent.callee);
            w.comma_list(&parent.args, Self::value_argument);
        });
    }

    pub(super) fn delegated_type_parent(&mut self, parent: &'a DelegatedTypeParent) {
        self.node(&parent.extras, |w| {
            w.type_ref(&parent.type_ref);
            w.space();
            w.token("by");
            w.space();
            w.expression(&parent.expression);
        });
    }

    pub(super) fn type_parent(&mut self, parent: &'a TypeParent) {
        self.node(&parent.extras, |w| w.type_ref(&parent.type_ref));
    }

    pub(super) fn class_body(&mut self, body: &'a ClassBody) {
        self.node(&body.extras, |w| {
            w.token("{");
            if body.enum_entries.is_some() || !body.declarations.is_empty() {
                w.indented(|w| {
                    if let Some(entries) = &body.enum_entries {
                        w.newline();
                        w.comma_list(entries, Self::enum_entry);
                        if !body.declarations.is_empty() {
                            w.synthetic(";");
                            w.blank_line();
                        }
                    }
                    for (index, declaration) in body.declarations.iter().enumerate() {
                        if index > 0 || body.enum_entries.is_none() {
                            w.newline();
                        }
                        w.declaration(declaration);
                    }
                });
                w.newline();
            }
            w.token("}");
        });
    }

    pub(super) fn enum_entry(&mut self, entry: &'a EnumEntry) {
        self.node(&entry.extras, |w| {
            w.modifiers(&entry.modifiers);
            w.name(&entry.name);
            if let Some(args) = &entry.args {
                w.comma_list(args, Self::value_argument);
            }
            if let Some(body) = &entry.body {
                w.space();
                w.class_body(body);
            }
        });
    }

    pub(super) fn init(&mut self, init: &'a InitDeclaration) {
        self.node(&init.extras, |w| {
            w.token("init");
            w.space();
            w.block(&init.block);
        });
    }

    pub(super) fn secondary_constructor(&mut self, constructor: &'a SecondaryConstructor) {
        self.node(&constructor.extras, |w| {
            w.modifiers(&constructor.modifiers);
            w.token("constructor");
            w.comma_list(&constructor.params, Self::function_param);
            if let Some(call) = &constructor.delegation_call {
                w.space();
                w.token(":");
                w.space();
                w.delegation_call(call);
            }
            if let Some(block) = &constructor.block {
                w.space();
                w.block(block);
            }
        });
    }

    pub(super) fn delegation_call(&mut self, call: &'a DelegationCall) {
        self.node(&call.extras, |w| {
            w.keyword(&call.target);
            w.comma_list(&call.args, Self::value_argument);
        });
    }

    pub(super) fn type_alias(&mut self, alias: &'a TypeAliasDeclaration) {
        self.node(&alias.extras, |w| {
            w.modifiers(&alias.modifiers);
            w.token("typealias");
            w.space();
            w.name(&alias.name);
            if let Some(type_params) = &alias.type_params {
                w.comma_list(type_params, Self::type_param);
            }
            w.space();
            w.token("=");
            w.space();
            w.type_ref(&alias.type_ref);
        });
    }

    // ==================
    // Functions
    // ==================

    pub(super) fn function(&mut self, function: &'a FunctionDeclaration) {
        self.node(&function.extras, |w| {
            w.modifiers(&function.modifiers);
            w.token("fun");
            if let Some(type_params) = &function.type_params {
                w.space();
                w.comma_list(type_params, Self::type_param);
            }
            if let Some(receiver) = &function.receiver_type {
                w.space();
                w.type_ref(receiver);
                w.token(".");
            }
            if let Some(name) = &function.name {
                if function.receiver_type.is_none() {
                    w.space();
                }
                w.name(name);
            }
            w.comma_list(&function.params, Self::function_param);
            if let Some(return_type) = &function.return_type {
                w.token(":");
                w.space();
                w.type_ref(return_type);
            }
            for post_modifier in &function.post_modifiers {
                w.space();
                w.post_modifier(post_modifier);
            }
            if let Some(body) = &function.body {
                w.space();
                w.function_body(body);
            }
        });
    }

    pub(super) fn function_param(&mut self, param: &'a FunctionParam) {
        self.node(&param.extras, |w| {
            w.modifiers(&param.modifiers);
            if let Some(keyword) = &param.val_or_var {
                w.keyword(keyword);
                w.space();
            }
            w.name(&param.name);
            if let Some(type_ref) = &param.type_ref {
                w.token(":");
                w.space();
                w.type_ref(type_ref);
            }
            if let Some(value) = &param.default_value {
                w.space();
                w.token("=");
                w.space();
                w.expression(value);
            }
        });
    }

    fn function_body(&mut self, body: &'a FunctionBody) {
        match body {
            FunctionBody::Block(block) => self.block(block),
            FunctionBody::Expression(body) => self.expression_body(body),
        }
    }

    pub(super) fn expression_body(&mut self, body: &'a ExpressionBody) {
        self.node(&body.extras, |w| {
            w.token("=");
            w.space();
            w.expression(&body.expression);
        });
    }

    // ==================
    // Properties
    // ==================

    pub(super) fn property(&mut self, property: &'a PropertyDeclaration) {
        self.node(&property.extras, |w| {
            w.modifiers(&property.modifiers);
            w.keyword(&property.val_or_var);
            if let Some(type_params) = &property.type_params {
                w.space();
                w.comma_list(type_params, Self::type_param);
            }
            w.space();
            if let Some(receiver) = &property.receiver_type {
                w.type_ref(receiver);
                w.token(".");
            }
            w.variable(&property.variable);
            if let Some(constraints) = &property.type_constraint_set {
                w.space();
                w.type_constraint_set(constraints);
            }
            if let Some(initializer) = &property.initializer {
                w.space();
                w.token("=");
                w.space();
                w.expression(initializer);
            }
            if let Some(delegate) = &property.delegate {
                w.space();
                w.property_delegate(delegate);
            }
            w.indented(|w| {
                for accessor in &property.accessors {
                    w.newline();
                    match accessor {
                        Accessor::Getter(getter) => w.getter(getter),
                        Accessor::Setter(setter) => w.setter(setter),
                    }
                }
            });
        });
    }

    pub(super) fn variable(&mut self, variable: &'a Variable) {
        match variable {
            Variable::Single(single) => self.single_variable(single),
            Variable::Multi(multi) => self.multi_variable(multi),
        }
    }

    pub(super) fn single_variable(&mut self, variable: &'a SingleVariable) {
        self.node(&variable.extras, |w| {
            w.name(&variable.name);
            if let Some(type_ref) = &variable.type_ref {
                w.token(":");
                w.space();
                w.type_ref(type_ref);
            }
        });
    }

    pub(super) fn multi_variable(&mut self, variable: &'a MultiVariable) {
        self.node(&variable.extras, |w| {
            w.comma_list(&variable.variables, Self::single_variable);
            if let Some(type_ref) = &variable.type_ref {
                w.token(":");
                w.space();
                w.type_ref(type_ref);
            }
        });
    }

    pub(super) fn property_delegate(&mut self, delegate: &'a PropertyDelegate) {
        self.node(&delegate.extras, |w| {
            w.token("by");
            w.space();
            w.expression(&delegate.expression);
        });
    }

    pub(super) fn getter(&mut self, getter: &'a Getter) {
        self.node(&getter.extras, |w| {
            w.modifiers(&getter.modifiers);
            w.token("get");
            w.accessor_rest(
                getter.params.as_ref(),
                getter.type_ref.as_ref(),
                getter.body.as_ref(),
            );
        });
    }

    pub(super) fn setter(&mut self, setter: &'a Setter) {
        self.node(&setter.extras, |w| {
            w.modifiers(&setter.modifiers);
            w.token("set");
            w.accessor_rest(
                setter.params.as_ref(),
                setter.type_ref.as_ref(),
                setter.body.as_ref(),
            );
        });
    }

    fn accessor_rest(
        &mut self,
        params: Option<&'a CommaSeparatedNodeList<FunctionParam>>,
        type_ref: Option<&'a TypeRef>,
        body: Option<&'a FunctionBody>,
    ) {
        if let Some(params) = params {
            self.comma_list(params, Self::function_param);
        }
        if let Some(type_ref) = type_ref {
            self.token(":");
            self.space();
            self.type_ref(type_ref);
        }
        if let Some(body) = body {
            self.space();
            self.function_body(body);
        }
    }
}
