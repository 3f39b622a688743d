//! The conversion pipeline for one component and the components it renders.

use crate::config::{Config, ProjectPaths};
use crate::custom::CustomDefinition;
use crate::customization::{AppliedCustomization, CustomizationLoader};
use crate::error::{ConvertError, ConvertResult};
use crate::progress::Progress;
use crate::registry::AliasRegistry;
use roos_common::{FileSystem, ManualReviewItem};
use roos_compiler_jinja::{
    automation_percentage, compile_to_jinja, review_document, BaseComponentRef, ClassBuilder,
    CompileOptions, ConditionalAttribute, DefinitionGenerator, DefinitionInput, NameMap,
    RootElement, RootTag, TemplateInput,
};
use roos_parser::scan::{is_identifier, string_literal};
use roos_parser::{
    extract_switches, parse_component, switch_class_mappings, walk_all, AttrExtractor,
    AttributeDescriptor, ClassExtraction, ClsxExtractor, ComponentUsage, ContentElement,
    ContentExtractor, JsxElement, NoBaseClasses, PropClassLookup, PropValue, SourceModel,
};
use roos_resolver::{
    analyze_arrays, BaseComponentResolver, BaseLookup, BaseResolution, NestedComponentDetector,
    NestedComponentRef,
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Output name when it differs from the source component's
    pub output_name: Option<String>,
    pub aliases: Vec<String>,
    pub convert_nested: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output_name: None,
            aliases: Vec::new(),
            convert_nested: true,
        }
    }
}

/// What happened to one nested component
#[derive(Debug, Clone, PartialEq)]
pub enum NestedOutcome {
    Converted(String),
    /// Its template was already generated
    Existing(String),
    Failed { name: String, error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionSummary {
    pub name: String,
    pub source_file: String,
    pub template: PathBuf,
    pub definition: PathBuf,
    pub review: PathBuf,
    pub review_items: usize,
    pub automation: usize,
    pub aliases: Vec<String>,
    pub nested: Vec<NestedOutcome>,
}

/// Source files of one component
#[derive(Debug, Clone)]
struct SourceFiles {
    /// Source component name; keys the customization file
    component: String,
    /// Declaration to pick when the file holds several
    hint: String,
    template: PathBuf,
    defaults: Option<PathBuf>,
}

/// The root element and everything resolved about it
struct Root {
    element: RootElement,
    base: Option<BaseComponentRef>,
    /// Base classes first, then the extracted ones
    classes: ClassExtraction,
}

pub struct Converter<'a> {
    fs: &'a dyn FileSystem,
    config: Config,
    paths: ProjectPaths,
    resolver: BaseComponentResolver,
    customizations: CustomizationLoader<'a>,
    progress: &'a dyn Progress,
}

impl<'a> Converter<'a> {
    /// Converter for the project rooted at `root`. Extra base mappings and
    /// the base library distribution are loaded when configured.
    pub fn new(
        root: &Path,
        config: Config,
        fs: &'a dyn FileSystem,
        progress: &'a dyn Progress,
    ) -> ConvertResult<Self> {
        let paths = config.paths(root);
        let mut resolver = BaseComponentResolver::new().with_distribution(&paths.node_modules, fs);
        if let Some(mappings) = &paths.mappings {
            resolver = resolver.with_mappings_file(mappings, fs)?;
        }
        Ok(Self {
            customizations: CustomizationLoader::new(paths.customizations.clone(), fs),
            fs,
            config,
            paths,
            resolver,
            progress,
        })
    }

    pub fn with_resolver(mut self, resolver: BaseComponentResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    /// Convert the component in `<components>/<component>`
    #[instrument(skip(self, options))]
    pub fn convert(&self, component: &str, options: &ConvertOptions) -> ConvertResult<ConversionSummary> {
        let files = self.locate(component)?;
        let mut in_progress = Vec::new();
        self.convert_files(&files, options, &mut in_progress)
    }

    fn locate(&self, component: &str) -> ConvertResult<SourceFiles> {
        let dir = self.paths.components.join(component);
        let template = dir.join(&self.config.template_file);
        if !self.fs.exists(&template) {
            return Err(ConvertError::missing("Template file", template));
        }
        let defaults = dir.join(&self.config.defaults_file);
        Ok(SourceFiles {
            component: component.to_string(),
            hint: component.to_string(),
            template,
            defaults: self.fs.exists(&defaults).then_some(defaults),
        })
    }

    /// Runs one conversion with `in_progress` guarding against cycles
    fn convert_files(
        &self,
        files: &SourceFiles,
        options: &ConvertOptions,
        in_progress: &mut Vec<String>,
    ) -> ConvertResult<ConversionSummary> {
        let name = options
            .output_name
            .clone()
            .unwrap_or_else(|| files.component.clone());
        if in_progress.contains(&name) {
            let mut chain = in_progress.clone();
            chain.push(name);
            return Err(ConvertError::Cycle { chain });
        }

        in_progress.push(name.clone());
        let result = self.run(&name, files, options, in_progress);
        in_progress.pop();
        result
    }

    fn run(
        &self,
        name: &str,
        files: &SourceFiles,
        options: &ConvertOptions,
        in_progress: &mut Vec<String>,
    ) -> ConvertResult<ConversionSummary> {
        let progress = self.progress;
        let source_file = self.paths.relative(&files.template);
        progress.start(&files.component, name, &options.aliases);

        progress.step("📁 Locating source files...");
        progress.ok(&format!("TSX: {}", source_file));
        if let Some(defaults) = &files.defaults {
            progress.ok(&format!("Defaults: {}", self.paths.relative(defaults)));
        }

        progress.step("📖 Parsing React component...");
        let source = self.read(&files.template)?;
        let defaults = files.defaults.as_deref().map(|p| self.read(p)).transpose()?;
        let model = parse_component(&source, defaults.as_deref(), Some(&files.hint))?;
        if model.render_body.is_empty() {
            return Err(ConvertError::structural(name, "no JSX render body found"));
        }
        progress.ok(&format!("Found {} attributes", model.attributes.len()));
        progress.ok(&format!(
            "Found {} default values",
            model.defaults.actual.len() + model.defaults.examples.len()
        ));
        progress.ok(&format!("Found {} imports", model.imports.len()));

        let mut attributes = model.attributes.clone();
        let mut review: Vec<ManualReviewItem> = Vec::new();

        let applied = match self.customizations.load(&files.component)? {
            Some(customization) => {
                progress.step("🎨 Applying customizations...");
                let applied = self.customizations.apply(&customization, &mut attributes)?;
                progress.ok("Customizations applied");
                for note in &applied.notes {
                    progress.info(note);
                }
                applied
            }
            None => AppliedCustomization::default(),
        };
        let mut aliases = options.aliases.clone();
        for alias in &applied.aliases {
            if !aliases.contains(alias) {
                aliases.push(alias.clone());
            }
        }

        let root_jsx = self.root_jsx(name, &model, &mut review)?;
        let nested = NestedComponentDetector::new(self.fs).detect(
            &model.imports,
            &model.render_body,
            &files.template,
        );
        let mut nested_outcomes = Vec::new();
        if !nested.is_empty() {
            progress.step("🧩 Detecting nested components...");
            for component in &nested {
                progress.ok(&format!("{} -> <{}>", component.component_class, component.tag_name));
                if !options.convert_nested {
                    continue;
                }
                let outcome = self.ensure_nested(component, in_progress);
                if let NestedOutcome::Failed { name: nested_name, error } = &outcome {
                    progress.warn(&format!("Nested component {} failed: {}", nested_name, error));
                    review.push(
                        ManualReviewItem::medium(format!(
                            "Nested component {} could not be converted",
                            component.component_class
                        ))
                        .with_context(error.clone())
                        .with_action("Convert the nested component separately"),
                    );
                }
                nested_outcomes.push(outcome);
            }
        }

        let mut values = model.defaults.examples.clone();
        for (key, value) in &model.defaults.actual {
            values.entry(key.clone()).or_insert_with(|| value.clone());
        }
        let array_shapes = analyze_arrays(&values, &attributes, &model.types, &nested);

        let root = self.resolve_root(&model, &root_jsx, &attributes, &mut review);

        let names = NameMap::for_attributes(&attributes);
        progress.step("🎨 Building CSS class logic...");
        let classes = ClassBuilder::from_extraction(&root.classes, &names);
        review.extend(root.classes.review.iter().cloned());
        progress.ok("Class builder configured");

        progress.step("📝 Extracting content rendering logic...");
        let extraction = ContentExtractor::new().extract(&root_jsx, &model.preamble);
        let mut content = extraction.elements;
        review.extend(extraction.review.into_iter().map(|item| {
            if item.line.is_none() {
                item.with_line(model.render_line)
            } else {
                item
            }
        }));
        if applied.children_support && !renders_children(&content) {
            content.push(ContentElement::reference("children"));
        }
        progress.ok(&format!("Found {} content elements", content.len()));
        let inline_components = self.inline_components(&model, &root_jsx, &content);

        progress.step("📝 Generating Jinja template...");
        let input = TemplateInput {
            name: name.to_string(),
            source_file: source_file.clone(),
            source_line: model.render_line,
            attributes: attributes.clone(),
            root: root.element,
            classes,
            content,
            custom_content: applied.custom_content.clone(),
            inline_components,
            array_shapes: array_shapes.clone(),
            nested: nested.clone(),
            pass_through: applied.pass_through.clone(),
        };
        let compilation = compile_to_jinja(&input, CompileOptions::default());
        review.extend(compilation.review);
        let template_path = self.paths.template(name);
        self.write(&template_path, &compilation.template)?;
        progress.ok(&format!("Written to: {}", self.paths.relative(&template_path)));

        progress.step("📋 Generating component definition...");
        let definition = DefinitionGenerator::new(name).generate(&DefinitionInput {
            source_file: source_file.clone(),
            source,
            attributes,
            base_components: root.base.into_iter().collect(),
            nested,
            array_shapes,
            review: review.clone(),
            example_values: model.defaults.examples.clone(),
        });
        let definition_path = self.paths.definition(name);
        self.write(&definition_path, &definition.to_json()?)?;
        progress.ok(&format!("Written to: {}", self.paths.relative(&definition_path)));

        let review_path = self.write_review(name, &review)?;
        self.register_aliases(name, &aliases)?;

        let summary = ConversionSummary {
            name: name.to_string(),
            source_file,
            template: template_path,
            definition: definition_path,
            review: review_path,
            review_items: review.len(),
            automation: automation_percentage(review.len()),
            aliases,
            nested: nested_outcomes,
        };
        info!(component = name, review = summary.review_items, "converted component");
        progress.finish(&summary);
        Ok(summary)
    }

    /// The first element of the render body; a fragment gives way to its
    /// first child element.
    fn root_jsx(
        &self,
        name: &str,
        model: &SourceModel,
        review: &mut Vec<ManualReviewItem>,
    ) -> ConvertResult<JsxElement> {
        let root = model
            .root_element()
            .ok_or_else(|| ConvertError::structural(name, "render body has no element"))?;
        if !root.is_fragment() {
            return Ok(root);
        }
        let first = root
            .child_elements()
            .next()
            .cloned()
            .ok_or_else(|| ConvertError::structural(name, "fragment root has no element"))?;
        review.push(
            ManualReviewItem::low(format!(
                "Fragment root: only the first element <{}> is the component root",
                first.name
            ))
            .with_line(model.render_line)
            .with_action("Check that sibling elements of the root are rendered as intended"),
        );
        Ok(first)
    }

    /// Tag, classes and attributes of the root element
    fn resolve_root(
        &self,
        model: &SourceModel,
        root: &JsxElement,
        attributes: &[AttributeDescriptor],
        review: &mut Vec<ManualReviewItem>,
    ) -> Root {
        let progress = self.progress;
        progress.step("🔍 Detecting base components...");
        let base = root
            .is_component()
            .then(|| self.base_import(model, &root.name))
            .flatten();
        match &base {
            Some(b) => progress.ok(&format!("{}/{}", b.library, b.component)),
            None => progress.info("No base components detected"),
        }

        progress.step("🔍 Extracting CSS class logic from clsx()...");
        let class_expr = match root.prop("className") {
            Some(PropValue::Expression(expr)) => Some(expr.clone()),
            _ => None,
        };
        let mut extraction = match root.prop("className") {
            Some(PropValue::Literal(classes)) => {
                let mut extraction = ClassExtraction::default();
                extraction.add_base(classes);
                extraction
            }
            Some(PropValue::Expression(expr)) => ClsxExtractor::new(attributes).extract(expr),
            _ => ClassExtraction::default(),
        };
        progress.ok(&format!("Found {} clsx mappings", extraction.mappings.len()));

        progress.step("🏗  Resolving base components...");
        let resolution = match &base {
            Some(b) => {
                let props = self.base_props(root, attributes);
                self.resolver.resolve(&b.library, &b.component, &props)
            }
            None if root.is_component() => {
                review.push(
                    ManualReviewItem::medium(format!(
                        "Root component <{}> is not a known base component",
                        root.name
                    ))
                    .with_line(model.render_line)
                    .with_action("Add a base mapping or convert the root component first"),
                );
                BaseResolution {
                    tag: "div".to_string(),
                    ..Default::default()
                }
            }
            None => BaseResolution {
                tag: root.name.clone(),
                ..Default::default()
            },
        };
        progress.ok(&format!("HTML tag: <{}>", resolution.tag));
        progress.ok(&format!("Base classes: {}", resolution.classes.join(", ")));

        let no_base = NoBaseClasses;
        let base_lookup = base
            .as_ref()
            .map(|b| BaseLookup::new(&self.resolver, &b.library, &b.component));
        let lookup: &dyn PropClassLookup = match &base_lookup {
            Some(l) => l,
            None => &no_base,
        };

        progress.step("🔀 Extracting switch statement logic...");
        let switches = extract_switches(&model.source);
        let mut skip: Vec<&str> = Vec::new();
        let mut switch_count = 0;
        for switch in &switches {
            let mappings = switch_class_mappings(
                switch,
                &root.props,
                class_expr.as_deref(),
                lookup,
                &resolution.classes,
            );
            switch_count += mappings.len();
            extraction.mappings.extend(mappings);
            for prop in &root.props {
                if matches!(&prop.value, PropValue::Expression(e) if e.trim() == switch.result_var) {
                    skip.push(prop.name.as_str());
                }
            }
        }
        progress.ok(&format!("Found {} switch mappings", switch_count));

        if base.is_some() {
            progress.step("📋 Extracting JSX attribute logic...");
            let attr_extraction =
                AttrExtractor::new(attributes, lookup, &resolution.classes).extract(&root.props, &skip);
            progress.ok(&format!(
                "Found {} JSX attr mappings",
                attr_extraction.mappings.len()
            ));
            extraction.merge(attr_extraction);
        }
        extraction.expand_templates(attributes);

        let conditional_attributes = match &base {
            Some(b) => self.conditional_attributes(b, root, attributes),
            None => Vec::new(),
        };

        let mapped = extraction.mapped_props();
        for prop in &resolution.unmapped_props {
            if !mapped.contains(prop.as_str()) {
                review.push(
                    ManualReviewItem::medium(format!("Unmapped prop: {}", prop))
                        .with_line(model.render_line),
                );
            }
        }
        review.extend(resolution.review.iter().cloned());

        let mut base_classes = resolution.classes.clone();
        for class in std::mem::take(&mut extraction.base_classes) {
            if !base_classes.contains(&class) {
                base_classes.push(class);
            }
        }
        extraction.base_classes = base_classes;

        let tag = match &model.dynamic_tag {
            Some(dynamic) if dynamic.variable == root.name => RootTag::Dynamic(dynamic.expression.clone()),
            _ => RootTag::Static(resolution.tag.clone()),
        };
        let mut attributes_out = resolution.attributes.clone();
        if !root.is_component() {
            for prop in &root.props {
                if let PropValue::Literal(value) = &prop.value {
                    if prop.name != "className" && prop.name != "key" {
                        attributes_out.insert(prop.name.clone(), value.clone());
                    }
                }
            }
        }

        Root {
            element: RootElement {
                tag,
                attributes: attributes_out,
                conditional_attributes,
                wrappers: resolution.wrapper.into_iter().collect(),
            },
            base,
            classes: extraction,
        }
    }

    /// The base library import `local` refers to
    fn base_import(&self, model: &SourceModel, local: &str) -> Option<BaseComponentRef> {
        model
            .imports
            .iter()
            .filter(|i| !i.type_only)
            .find_map(|import| {
                let component = import.imported_name(local)?;
                self.resolver
                    .is_base_component(&import.source, component)
                    .then(|| BaseComponentRef {
                        library: import.source.clone(),
                        component: component.to_string(),
                    })
            })
    }

    /// Prop values handed to the base resolver: literals, flags and
    /// forwarded attributes with an actual default
    fn base_props(&self, root: &JsxElement, attributes: &[AttributeDescriptor]) -> Map<String, Value> {
        let mut props = Map::new();
        for prop in &root.props {
            if matches!(prop.name.as_str(), "className" | "key" | "ref") || prop.name.starts_with("on") {
                continue;
            }
            let value = match &prop.value {
                PropValue::Literal(text) => Some(Value::String(text.clone())),
                PropValue::Flag => Some(Value::Bool(true)),
                PropValue::Expression(expr) => string_literal(expr).map(Value::String).or_else(|| {
                    let name = forwarded_attribute(expr)?;
                    attributes
                        .iter()
                        .find(|a| a.name == name && !a.is_boolean())?
                        .actual_default()
                        .cloned()
                }),
            };
            if let Some(value) = value {
                props.insert(prop.name.clone(), value);
            }
        }
        props
    }

    /// Attributes the base component only renders while a forwarded
    /// boolean attribute is set
    fn conditional_attributes(
        &self,
        base: &BaseComponentRef,
        root: &JsxElement,
        attributes: &[AttributeDescriptor],
    ) -> Vec<ConditionalAttribute> {
        let off = self.resolver.resolve(&base.library, &base.component, &Map::new());
        let mut out = Vec::new();

        for prop in &root.props {
            let PropValue::Expression(expr) = &prop.value else {
                continue;
            };
            let Some(attr) = forwarded_attribute(expr)
                .and_then(|name| attributes.iter().find(|a| a.name == name && a.is_boolean()))
            else {
                continue;
            };
            let mut props = Map::new();
            props.insert(prop.name.clone(), Value::Bool(true));
            let on = self.resolver.resolve(&base.library, &base.component, &props);
            for (name, value) in &on.attributes {
                if off.attributes.get(name) != Some(value) {
                    debug!(attribute = %name, condition = %attr.name, "conditional root attribute");
                    out.push(ConditionalAttribute {
                        condition: attr.name.clone(),
                        name: name.clone(),
                        value: value.clone(),
                    });
                }
            }
        }
        out
    }

    /// Base library components used inside the content, resolved with
    /// their literal props
    fn inline_components(
        &self,
        model: &SourceModel,
        root: &JsxElement,
        content: &[ContentElement],
    ) -> BTreeMap<String, BaseResolution> {
        let mut usages: Vec<ComponentUsage> = Vec::new();
        walk_all(content, |element| match element {
            ContentElement::Component(usage)
            | ContentElement::ConditionalComponent {
                component: usage, ..
            } => usages.push(usage.clone()),
            _ => {}
        });

        let mut resolved = BTreeMap::new();
        for usage in usages {
            if usage.name == root.name || resolved.contains_key(&usage.name) {
                continue;
            }
            let Some(base) = self.base_import(model, &usage.name) else {
                continue;
            };
            let mut props = Map::new();
            for prop in &usage.props {
                match &prop.value {
                    PropValue::Literal(text) => {
                        props.insert(prop.name.clone(), Value::String(text.clone()));
                    }
                    PropValue::Flag => {
                        props.insert(prop.name.clone(), Value::Bool(true));
                    }
                    PropValue::Expression(expr) => {
                        if let Some(text) = string_literal(expr) {
                            props.insert(prop.name.clone(), Value::String(text));
                        }
                    }
                }
            }
            let resolution = self.resolver.resolve(&base.library, &base.component, &props);
            resolved.insert(usage.name.clone(), resolution);
        }
        resolved
    }

    /// Make sure a nested component's template exists
    fn ensure_nested(&self, nested: &NestedComponentRef, in_progress: &mut Vec<String>) -> NestedOutcome {
        let Some(path) = &nested.resolved_path else {
            return NestedOutcome::Failed {
                name: nested.name.clone(),
                error: format!("cannot resolve import {}", nested.source_path),
            };
        };
        if self.fs.exists(&self.paths.template(&nested.name)) {
            debug!(component = %nested.name, "nested component already converted");
            return NestedOutcome::Existing(nested.name.clone());
        }

        let component = self.component_for(path);
        let defaults = component.as_ref().and_then(|c| {
            let defaults = self.paths.components.join(c).join(&self.config.defaults_file);
            self.fs.exists(&defaults).then_some(defaults)
        });
        let files = SourceFiles {
            component: component.unwrap_or_else(|| nested.name.clone()),
            hint: nested.component_class.clone(),
            template: path.clone(),
            defaults,
        };
        let options = ConvertOptions {
            output_name: Some(nested.name.clone()),
            aliases: Vec::new(),
            convert_nested: true,
        };

        match self.convert_files(&files, &options, in_progress) {
            Ok(_) => NestedOutcome::Converted(nested.name.clone()),
            Err(e) => {
                warn!(component = %nested.name, error = %e, "nested conversion failed");
                NestedOutcome::Failed {
                    name: nested.name.clone(),
                    error: e.to_string(),
                }
            }
        }
    }

    /// The component directory `path` is the template file of, if any
    fn component_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.paths.components).ok()?;
        let mut parts = relative.components();
        let component = parts.next()?.as_os_str().to_string_lossy().to_string();
        let rest: PathBuf = parts.collect();
        (rest == Path::new(&self.config.template_file)).then_some(component)
    }

    /// Generate a component from a custom definition file
    #[instrument(skip(self, options), fields(path = %definition_path.display()))]
    pub fn convert_custom(
        &self,
        definition_path: &Path,
        options: &ConvertOptions,
    ) -> ConvertResult<ConversionSummary> {
        if !self.fs.exists(definition_path) {
            return Err(ConvertError::missing("Custom definition", definition_path));
        }
        let text = self.read(definition_path)?;
        let custom = CustomDefinition::from_json(&text, definition_path)?;
        let name = options
            .output_name
            .clone()
            .or_else(|| custom.name.clone())
            .or_else(|| {
                definition_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
            })
            .ok_or_else(|| ConvertError::structural("custom component", "no component name"))?;

        let progress = self.progress;
        let mut aliases = options.aliases.clone();
        for alias in &custom.aliases {
            if !aliases.contains(alias) {
                aliases.push(alias.clone());
            }
        }
        progress.start(&name, &name, &aliases);

        let source_file = self.paths.relative(definition_path);
        progress.step("📝 Generating Jinja template...");
        let input = custom.template_input(&name, &source_file);
        let compilation = compile_to_jinja(&input, CompileOptions::default());
        let template_path = self.paths.template(&name);
        self.write(&template_path, &compilation.template)?;
        progress.ok(&format!("Written to: {}", self.paths.relative(&template_path)));

        progress.step("📋 Generating component definition...");
        let definition = DefinitionGenerator::new(&name).generate(&DefinitionInput {
            source_file: source_file.clone(),
            source: text,
            attributes: input.attributes.clone(),
            review: compilation.review.clone(),
            ..Default::default()
        });
        let definition_path_out = self.paths.definition(&name);
        self.write(&definition_path_out, &definition.to_json()?)?;
        progress.ok(&format!(
            "Written to: {}",
            self.paths.relative(&definition_path_out)
        ));

        let review_path = self.write_review(&name, &compilation.review)?;
        self.register_aliases(&name, &aliases)?;

        let summary = ConversionSummary {
            name: name.clone(),
            source_file,
            template: template_path,
            definition: definition_path_out,
            review: review_path,
            review_items: compilation.review.len(),
            automation: automation_percentage(compilation.review.len()),
            aliases,
            nested: Vec::new(),
        };
        progress.finish(&summary);
        Ok(summary)
    }

    fn write_review(&self, name: &str, review: &[ManualReviewItem]) -> ConvertResult<PathBuf> {
        self.progress.step("📄 Generating review document...");
        let path = self.paths.review_document(name);
        self.write(&path, &review_document(name, review))?;
        self.progress
            .ok(&format!("Written to: {}", self.paths.relative(&path)));
        Ok(path)
    }

    fn register_aliases(&self, name: &str, aliases: &[String]) -> ConvertResult<()> {
        if aliases.is_empty() {
            return Ok(());
        }
        self.progress.step("🏷  Registering aliases...");
        let mut registry = AliasRegistry::load(&self.paths.registry, self.fs)?;
        for alias in aliases {
            if registry.register(alias, name) {
                self.progress
                    .warn(&format!("Updated existing alias: {}", alias));
            }
        }
        registry.store(self.fs)?;
        self.progress.ok(&format!(
            "Registered {} alias(es): {}",
            aliases.len(),
            aliases.join(", ")
        ));
        Ok(())
    }

    fn read(&self, path: &Path) -> ConvertResult<String> {
        self.fs
            .read_to_string(path)
            .map_err(|e| ConvertError::io(path, e))
    }

    fn write(&self, path: &Path, contents: &str) -> ConvertResult<()> {
        self.fs
            .write(path, contents)
            .map_err(|e| ConvertError::io(path, e))
    }
}

/// Source component behind a definition's `source_file`; `None` for
/// nested and custom sources
pub fn component_from_source(source_file: &str, config: &Config) -> Option<String> {
    let prefix = format!("{}/", config.components_dir.trim_end_matches('/'));
    let rest = source_file.strip_prefix(&prefix)?;
    let (component, file) = rest.split_once('/')?;
    (file == config.template_file).then(|| component.to_string())
}

/// `label` or `props.label`
fn forwarded_attribute(expr: &str) -> Option<&str> {
    let t = expr.trim();
    let name = t.strip_prefix("props.").unwrap_or(t);
    is_identifier(name).then_some(name)
}

fn renders_children(content: &[ContentElement]) -> bool {
    let mut found = false;
    walk_all(content, |element| match element {
        ContentElement::Reference { name, .. } if name == "children" => found = true,
        ContentElement::Fallback { chain } if chain.iter().any(|l| l == "children") => found = true,
        ContentElement::ContentCall { argument, .. } if argument.contains("children") => found = true,
        _ => {}
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_component_from_source() {
        let config = Config::default();
        assert_eq!(
            component_from_source("rvo/components/button/src/template.tsx", &config),
            Some("button".to_string())
        );
        assert_eq!(
            component_from_source("rvo/components/progress-tracker/src/step.tsx", &config),
            None
        );
        assert_eq!(component_from_source("custom/card.json", &config), None);
    }

    #[test]
    fn test_forwarded_attribute() {
        assert_eq!(forwarded_attribute("props.busy"), Some("busy"));
        assert_eq!(forwarded_attribute(" size "), Some("size"));
        assert_eq!(forwarded_attribute("a && b"), None);
    }

    #[test]
    fn test_renders_children() {
        assert!(renders_children(&[ContentElement::Fallback {
            chain: vec!["children".into(), "label".into()],
        }]));
        assert!(!renders_children(&[ContentElement::reference("label")]));
    }
}
