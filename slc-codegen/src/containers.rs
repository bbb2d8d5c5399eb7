use crate::context::CCodeGen;

/// Phase 6 struct typedefs and phase 9 function bodies for the built-in
/// container families (SPEC_FULL §4.4 items 6 and 9). Struct layout and
/// the non-templated operations are ported from the reference codegen's
/// `_emit_list_functions`/`_emit_map_functions`/`_emit_set_functions`
/// family (with the `__btrc_` helper prefix renamed); the higher-order
/// function bodies (`forEach`/`filter`/`any`/`all`/`findIndex`/`map`/
/// `reduce`/`containsValue`) are rendered by [`slc_runtime::collections`]
/// so the two crates agree on one set of templates.
impl CCodeGen {
    pub fn emit_tuple_struct_typedef(&mut self, mangled_args: &[String], c_types: &[String]) {
        let name = format!("sl_Tuple_{}", mangled_args.join("_"));
        self.emit("typedef struct {");
        for (i, c_type) in c_types.iter().enumerate() {
            self.emit(format!("    {c_type} _{i};"));
        }
        self.emit(format!("}} {name};"));
        self.emit_blank();
    }

    pub fn emit_list_struct_typedef(&mut self, c_type: &str, mangled: &str) {
        let name = format!("sl_List_{mangled}");
        self.emit("typedef struct {");
        self.emit(format!("    {c_type}* data;"));
        self.emit("    int len;");
        self.emit("    int cap;");
        self.emit(format!("}} {name};"));
        self.emit_blank();
    }

    pub fn emit_array_struct_typedef(&mut self, c_type: &str, mangled: &str) {
        let name = format!("sl_Array_{mangled}");
        self.emit("typedef struct {");
        self.emit(format!("    {c_type}* data;"));
        self.emit("    int len;");
        self.emit(format!("}} {name};"));
        self.emit_blank();
    }

    pub fn emit_map_struct_typedef(&mut self, k_type: &str, v_type: &str, k_mangled: &str, v_mangled: &str) {
        let name = format!("sl_Map_{k_mangled}_{v_mangled}");
        self.emit("typedef struct {");
        self.emit(format!("    {k_type}* keys;"));
        self.emit(format!("    {v_type}* values;"));
        self.emit("    bool* occupied;");
        self.emit("    int cap;");
        self.emit("    int len;");
        self.emit(format!("}} {name};"));
        self.emit_blank();
    }

    pub fn emit_set_struct_typedef(&mut self, c_type: &str, mangled: &str) {
        let name = format!("sl_Set_{mangled}");
        self.emit("typedef struct {");
        self.emit(format!("    {c_type}* keys;"));
        self.emit("    bool* occupied;");
        self.emit("    int cap;");
        self.emit("    int len;");
        self.emit(format!("}} {name};"));
        self.emit_blank();
    }

    fn is_collection_struct(c_type: &str) -> bool {
        c_type.starts_with("sl_List_") || c_type.starts_with("sl_Map_") || c_type.starts_with("sl_Set_")
    }

    fn is_numeric_c_type(c_type: &str) -> bool {
        matches!(c_type, "int" | "float" | "double" | "long" | "short" | "unsigned int" | "unsigned long")
    }

    fn is_primitive_c_type(&self, c_type: &str) -> bool {
        !self.class_names.contains(c_type) && !Self::is_collection_struct(c_type)
    }

    pub fn emit_list_functions(&mut self, c_type: &str, mangled: &str) {
        let name = format!("sl_List_{mangled}");
        let is_primitive = self.is_primitive_c_type(c_type);
        let is_string = c_type == "char*";
        let eq_expr = if is_string {
            "strcmp(list->data[i], val) == 0".to_string()
        } else {
            "list->data[i] == val".to_string()
        };

        self.emit(format!("static inline {name}* {name}_new(void) {{"));
        self.emit(format!("    {name}* list = ({name}*)__sl_safe_calloc(1, sizeof({name}));"));
        self.emit("    return list;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_push({name}* list, {c_type} val) {{"));
        self.emit("    if (list->len >= list->cap) {");
        self.emit("        list->cap = list->cap ? list->cap * 2 : 4;");
        self.emit(format!(
            "        list->data = ({c_type}*)__sl_safe_realloc(list->data, sizeof({c_type}) * (size_t)list->cap);"
        ));
        self.emit("    }");
        self.emit("    list->data[list->len++] = val;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {c_type} {name}_get({name}* list, int i) {{"));
        self.emit("    if (i < 0 || i >= list->len) { fprintf(stderr, \"List index out of bounds: %d (len=%d)\\n\", i, list->len); exit(1); }");
        self.emit("    return list->data[i];");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_set({name}* list, int i, {c_type} val) {{"));
        self.emit("    if (i < 0 || i >= list->len) { fprintf(stderr, \"List index out of bounds: %d (len=%d)\\n\", i, list->len); exit(1); }");
        self.emit("    list->data[i] = val;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_free({name}* list) {{"));
        self.emit("    free(list->data);");
        self.emit("    free(list);");
        self.emit("}");
        self.emit_blank();

        if is_primitive {
            self.emit(format!("static inline bool {name}_contains({name}* list, {c_type} val) {{"));
            self.emit("    for (int i = 0; i < list->len; i++) {");
            self.emit(format!("        if ({eq_expr}) return true;"));
            self.emit("    }");
            self.emit("    return false;");
            self.emit("}");
            self.emit_blank();

            self.emit(format!("static inline int {name}_indexOf({name}* list, {c_type} val) {{"));
            self.emit("    for (int i = 0; i < list->len; i++) {");
            self.emit(format!("        if ({eq_expr}) return i;"));
            self.emit("    }");
            self.emit("    return -1;");
            self.emit("}");
            self.emit_blank();

            self.emit(format!("static inline int {name}_lastIndexOf({name}* list, {c_type} val) {{"));
            self.emit("    for (int i = list->len - 1; i >= 0; i--) {");
            self.emit(format!("        if ({eq_expr}) return i;"));
            self.emit("    }");
            self.emit("    return -1;");
            self.emit("}");
            self.emit_blank();
        }

        self.emit(format!("static inline void {name}_remove({name}* list, int idx) {{"));
        self.emit("    if (idx < 0 || idx >= list->len) { fprintf(stderr, \"List remove index out of bounds: %d (len=%d)\\n\", idx, list->len); exit(1); }");
        self.emit("    for (int i = idx; i < list->len - 1; i++) {");
        self.emit("        list->data[i] = list->data[i + 1];");
        self.emit("    }");
        self.emit("    list->len--;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_reverse({name}* list) {{"));
        self.emit("    for (int i = 0; i < list->len / 2; i++) {");
        self.emit(format!("        {c_type} tmp = list->data[i];"));
        self.emit("        list->data[i] = list->data[list->len - 1 - i];");
        self.emit("        list->data[list->len - 1 - i] = tmp;");
        self.emit("    }");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {name}* {name}_reversed({name}* list) {{"));
        self.emit(format!("    {name}* result = {name}_new();"));
        self.emit(format!("    for (int i = list->len - 1; i >= 0; i--) {name}_push(result, list->data[i]);"));
        self.emit("    return result;");
        self.emit("}");
        self.emit_blank();

        if is_primitive {
            self.emit(format!("static int __{name}_cmp(const void* a, const void* b) {{"));
            if is_string {
                self.emit("    return strcmp(*(char**)a, *(char**)b);");
            } else {
                self.emit(format!("    {c_type} va = *({c_type}*)a;"));
                self.emit(format!("    {c_type} vb = *({c_type}*)b;"));
                self.emit("    return (va > vb) - (va < vb);");
            }
            self.emit("}");
            self.emit(format!("static inline void {name}_sort({name}* list) {{"));
            self.emit(format!("    qsort(list->data, (size_t)list->len, sizeof({c_type}), __{name}_cmp);"));
            self.emit("}");
            self.emit_blank();

            self.emit(format!("static inline {name}* {name}_sorted({name}* list) {{"));
            self.emit(format!("    {name}* result = {name}_new();"));
            self.emit(format!("    for (int i = 0; i < list->len; i++) {name}_push(result, list->data[i]);"));
            self.emit(format!("    qsort(result->data, (size_t)result->len, sizeof({c_type}), __{name}_cmp);"));
            self.emit("    return result;");
            self.emit("}");
            self.emit_blank();
        }

        if Self::is_numeric_c_type(c_type) {
            self.emit(format!("static inline {c_type} {name}_min({name}* list) {{"));
            self.emit("    if (list->len <= 0) { fprintf(stderr, \"List min on empty list\\n\"); exit(1); }");
            self.emit(format!("    {c_type} m = list->data[0];"));
            self.emit("    for (int i = 1; i < list->len; i++) if (list->data[i] < m) m = list->data[i];");
            self.emit("    return m;");
            self.emit("}");
            self.emit_blank();

            self.emit(format!("static inline {c_type} {name}_max({name}* list) {{"));
            self.emit("    if (list->len <= 0) { fprintf(stderr, \"List max on empty list\\n\"); exit(1); }");
            self.emit(format!("    {c_type} m = list->data[0];"));
            self.emit("    for (int i = 1; i < list->len; i++) if (list->data[i] > m) m = list->data[i];");
            self.emit("    return m;");
            self.emit("}");
            self.emit_blank();

            self.emit(format!("static inline {c_type} {name}_sum({name}* list) {{"));
            self.emit(format!("    {c_type} s = 0;"));
            self.emit("    for (int i = 0; i < list->len; i++) s += list->data[i];");
            self.emit("    return s;");
            self.emit("}");
            self.emit_blank();
        }

        self.emit(format!("static inline void {name}_swap({name}* list, int i, int j) {{"));
        self.emit("    if (i < 0 || i >= list->len || j < 0 || j >= list->len) { fprintf(stderr, \"List swap index out of bounds\\n\"); exit(1); }");
        self.emit(format!("    {c_type} tmp = list->data[i]; list->data[i] = list->data[j]; list->data[j] = tmp;"));
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {c_type} {name}_pop({name}* list) {{"));
        self.emit("    if (list->len <= 0) { fprintf(stderr, \"List pop from empty list\\n\"); exit(1); }");
        self.emit("    return list->data[--list->len];");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_clear({name}* list) {{"));
        self.emit("    list->len = 0;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_fill({name}* list, {c_type} val) {{"));
        self.emit("    for (int i = 0; i < list->len; i++) list->data[i] = val;");
        self.emit("}");
        self.emit_blank();

        if is_primitive {
            self.emit(format!("static inline int {name}_count({name}* list, {c_type} val) {{"));
            self.emit("    int c = 0;");
            self.emit(format!("    for (int i = 0; i < list->len; i++) if ({eq_expr}) c++;"));
            self.emit("    return c;");
            self.emit("}");
            self.emit_blank();

            self.emit(format!("static inline void {name}_removeAll({name}* list, {c_type} val) {{"));
            self.emit("    int j = 0;");
            self.emit("    for (int i = 0; i < list->len; i++) {");
            self.emit(format!("        if (!({eq_expr})) list->data[j++] = list->data[i];"));
            self.emit("    }");
            self.emit("    list->len = j;");
            self.emit("}");
            self.emit_blank();

            self.emit(format!("static inline {name}* {name}_distinct({name}* list) {{"));
            self.emit(format!("    {name}* result = {name}_new();"));
            self.emit("    for (int i = 0; i < list->len; i++) {");
            self.emit(format!("        if (!{name}_contains(result, list->data[i])) {{"));
            self.emit(format!("            {name}_push(result, list->data[i]);"));
            self.emit("        }");
            self.emit("    }");
            self.emit("    return result;");
            self.emit("}");
            self.emit_blank();
        }

        self.emit(format!("static inline {name}* {name}_slice({name}* list, int start, int end) {{"));
        self.emit("    if (start < 0) start = list->len + start;");
        self.emit("    if (end < 0) end = list->len + end;");
        self.emit("    if (start < 0) start = 0;");
        self.emit("    if (end > list->len) end = list->len;");
        self.emit(format!("    {name}* result = {name}_new();"));
        self.emit("    for (int i = start; i < end; i++) {");
        self.emit(format!("        {name}_push(result, list->data[i]);"));
        self.emit("    }");
        self.emit("    return result;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {name}* {name}_take({name}* list, int n) {{"));
        self.emit("    if (n > list->len) n = list->len;");
        self.emit("    if (n < 0) n = 0;");
        self.emit(format!("    return {name}_slice(list, 0, n);"));
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {name}* {name}_drop({name}* list, int n) {{"));
        self.emit("    if (n > list->len) n = list->len;");
        self.emit("    if (n < 0) n = 0;");
        self.emit(format!("    return {name}_slice(list, n, list->len);"));
        self.emit("}");
        self.emit_blank();

        if is_string {
            self.emit(format!("static inline char* {name}_join({name}* list, const char* sep) {{"));
            self.emit("    size_t total = 0;");
            self.emit("    size_t sep_len = strlen(sep);");
            self.emit("    for (int i = 0; i < list->len; i++) {");
            self.emit("        total += strlen(list->data[i]);");
            self.emit("        if (i < list->len - 1) total += sep_len;");
            self.emit("    }");
            self.emit("    char* result = (char*)malloc(total + 1);");
            self.emit("    size_t pos = 0;");
            self.emit("    for (int i = 0; i < list->len; i++) {");
            self.emit("        size_t slen = strlen(list->data[i]);");
            self.emit("        memcpy(result + pos, list->data[i], slen); pos += slen;");
            self.emit("        if (i < list->len - 1) { memcpy(result + pos, sep, sep_len); pos += sep_len; }");
            self.emit("    }");
            self.emit("    result[pos] = '\\0';");
            self.emit("    return result;");
            self.emit("}");
            self.emit_blank();

            self.emit(format!("static inline char* {name}_joinToString({name}* list, const char* sep) {{"));
            self.emit(format!("    return {name}_join(list, sep);"));
            self.emit("}");
            self.emit_blank();
        }

        self.emit_raw(slc_runtime::collections::list_for_each(&name, c_type));
        self.emit_blank();
        self.emit_raw(slc_runtime::collections::list_filter(&name, c_type));
        self.emit_blank();
        self.emit_raw(slc_runtime::collections::list_any(&name, c_type));
        self.emit_blank();
        self.emit_raw(slc_runtime::collections::list_all(&name, c_type));
        self.emit_blank();
        self.emit_raw(slc_runtime::collections::list_find_index(&name, c_type));
        self.emit_blank();

        self.emit(format!("static inline int {name}_size({name}* list) {{"));
        self.emit("    return list->len;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline bool {name}_isEmpty({name}* list) {{"));
        self.emit("    return list->len == 0;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {c_type} {name}_first({name}* list) {{"));
        self.emit("    if (list->len == 0) { fprintf(stderr, \"List.first() called on empty list\\n\"); exit(1); }");
        self.emit("    return list->data[0];");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {c_type} {name}_last({name}* list) {{"));
        self.emit("    if (list->len == 0) { fprintf(stderr, \"List.last() called on empty list\\n\"); exit(1); }");
        self.emit("    return list->data[list->len - 1];");
        self.emit("}");
        self.emit_blank();

        self.emit_raw(slc_runtime::collections::list_map(&name, c_type, &name, c_type));
        self.emit_blank();
        self.emit_raw(slc_runtime::collections::list_reduce(&name, c_type, c_type));
        self.emit_blank();

        self.emit(format!("static inline void {name}_extend({name}* list, {name}* other) {{"));
        self.emit(format!("    for (int i = 0; i < other->len; i++) {name}_push(list, other->data[i]);"));
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_insert({name}* list, int idx, {c_type} val) {{"));
        self.emit("    if (idx < 0 || idx > list->len) { fprintf(stderr, \"List insert index out of bounds: %d (size %d)\\n\", idx, list->len); exit(1); }");
        self.emit("    if (list->len >= list->cap) {");
        self.emit("        list->cap = list->cap == 0 ? 4 : list->cap * 2;");
        self.emit(format!(
            "        list->data = ({c_type}*)__sl_safe_realloc(list->data, sizeof({c_type}) * (size_t)list->cap);"
        ));
        self.emit("    }");
        self.emit("    for (int i = list->len; i > idx; i--) list->data[i] = list->data[i-1];");
        self.emit("    list->data[idx] = val;");
        self.emit("    list->len++;");
        self.emit("}");
        self.emit_blank();
    }

    fn hash_and_eq(&mut self, k_type: &str, container_var: &str) -> (String, String) {
        if k_type == "char*" {
            self.emit_helper("__sl_hash_str");
            (
                "__sl_hash_str(key)".to_string(),
                format!("strcmp({container_var}->keys[idx], key) == 0"),
            )
        } else {
            ("(unsigned long)key".to_string(), format!("{container_var}->keys[idx] == key"))
        }
    }

    pub fn emit_map_functions(&mut self, k_type: &str, v_type: &str, k_mangled: &str, v_mangled: &str) {
        let name = format!("sl_Map_{k_mangled}_{v_mangled}");
        let (hash_expr, eq_expr) = self.hash_and_eq(k_type, "map");

        self.emit(format!("static inline {name}* {name}_new(void) {{"));
        self.emit(format!("    {name}* map = ({name}*)__sl_safe_calloc(1, sizeof({name}));"));
        self.emit("    map->cap = 16;");
        self.emit(format!("    map->keys = ({k_type}*)__sl_safe_calloc((size_t)map->cap, sizeof({k_type}));"));
        self.emit(format!("    map->values = ({v_type}*)__sl_safe_calloc((size_t)map->cap, sizeof({v_type}));"));
        self.emit("    map->occupied = (bool*)__sl_safe_calloc((size_t)map->cap, sizeof(bool));");
        self.emit("    return map;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_put({name}* map, {k_type} key, {v_type} value);"));
        self.emit_blank();

        self.emit(format!("static inline void {name}_resize({name}* map) {{"));
        self.emit("    int old_cap = map->cap;");
        self.emit(format!("    {k_type}* old_keys = map->keys;"));
        self.emit(format!("    {v_type}* old_values = map->values;"));
        self.emit("    bool* old_occupied = map->occupied;");
        self.emit("    map->cap *= 2;");
        self.emit("    map->len = 0;");
        self.emit(format!("    map->keys = ({k_type}*)__sl_safe_calloc((size_t)map->cap, sizeof({k_type}));"));
        self.emit(format!("    map->values = ({v_type}*)__sl_safe_calloc((size_t)map->cap, sizeof({v_type}));"));
        self.emit("    map->occupied = (bool*)__sl_safe_calloc((size_t)map->cap, sizeof(bool));");
        self.emit("    for (int i = 0; i < old_cap; i++) {");
        self.emit("        if (old_occupied[i]) {");
        self.emit(format!("            {name}_put(map, old_keys[i], old_values[i]);"));
        self.emit("        }");
        self.emit("    }");
        self.emit("    free(old_keys);");
        self.emit("    free(old_values);");
        self.emit("    free(old_occupied);");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_put({name}* map, {k_type} key, {v_type} value) {{"));
        self.emit(format!("    if (map->len * 4 >= map->cap * 3) {{ {name}_resize(map); }}"));
        self.emit(format!("    int idx = (int)({hash_expr} % (unsigned long)map->cap);"));
        self.emit("    while (map->occupied[idx]) {");
        self.emit(format!("        if ({eq_expr}) {{ map->values[idx] = value; return; }}"));
        self.emit("        idx = (idx + 1) % map->cap;");
        self.emit("    }");
        self.emit("    map->keys[idx] = key;");
        self.emit("    map->values[idx] = value;");
        self.emit("    map->occupied[idx] = true;");
        self.emit("    map->len++;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {v_type} {name}_get({name}* map, {k_type} key) {{"));
        self.emit(format!("    int idx = (int)({hash_expr} % (unsigned long)map->cap);"));
        self.emit("    while (map->occupied[idx]) {");
        self.emit(format!("        if ({eq_expr}) return map->values[idx];"));
        self.emit("        idx = (idx + 1) % map->cap;");
        self.emit("    }");
        self.emit("    fprintf(stderr, \"Map key not found\\n\"); exit(1);");
        if v_type.ends_with('*') {
            self.emit("    return NULL;");
        } else {
            self.emit(format!("    return ({v_type})0;"));
        }
        self.emit("}");
        self.emit_blank();

        self.emit(format!(
            "static inline {v_type} {name}_getOrDefault({name}* map, {k_type} key, {v_type} fallback) {{"
        ));
        self.emit(format!("    int idx = (int)({hash_expr} % (unsigned long)map->cap);"));
        self.emit("    while (map->occupied[idx]) {");
        self.emit(format!("        if ({eq_expr}) return map->values[idx];"));
        self.emit("        idx = (idx + 1) % map->cap;");
        self.emit("    }");
        self.emit("    return fallback;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline bool {name}_has({name}* map, {k_type} key) {{"));
        self.emit(format!("    int idx = (int)({hash_expr} % (unsigned long)map->cap);"));
        self.emit("    while (map->occupied[idx]) {");
        self.emit(format!("        if ({eq_expr}) return true;"));
        self.emit("        idx = (idx + 1) % map->cap;");
        self.emit("    }");
        self.emit("    return false;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline bool {name}_contains({name}* map, {k_type} key) {{"));
        self.emit(format!("    return {name}_has(map, key);"));
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_putIfAbsent({name}* map, {k_type} key, {v_type} value) {{"));
        self.emit(format!("    if (!{name}_has(map, key)) {name}_put(map, key, value);"));
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_free({name}* map) {{"));
        self.emit("    free(map->keys);");
        self.emit("    free(map->values);");
        self.emit("    free(map->occupied);");
        self.emit("    free(map);");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_remove({name}* map, {k_type} key) {{"));
        self.emit(format!("    int idx = (int)({hash_expr} % (unsigned long)map->cap);"));
        self.emit("    while (map->occupied[idx]) {");
        self.emit(format!("        if ({eq_expr}) {{"));
        self.emit("            map->occupied[idx] = false;");
        self.emit("            map->len--;");
        self.emit("            int j = (idx + 1) % map->cap;");
        self.emit("            while (map->occupied[j]) {");
        self.emit(format!("                {k_type} rk = map->keys[j];"));
        self.emit(format!("                {v_type} rv = map->values[j];"));
        self.emit("                map->occupied[j] = false;");
        self.emit("                map->len--;");
        self.emit(format!("                {name}_put(map, rk, rv);"));
        self.emit("                j = (j + 1) % map->cap;");
        self.emit("            }");
        self.emit("            return;");
        self.emit("        }");
        self.emit("        idx = (idx + 1) % map->cap;");
        self.emit("    }");
        self.emit("}");
        self.emit_blank();

        let k_list = format!("sl_List_{k_mangled}");
        self.emit(format!("static inline {k_list}* {name}_keys({name}* map) {{"));
        self.emit(format!("    {k_list}* result = {k_list}_new();"));
        self.emit("    for (int i = 0; i < map->cap; i++) {");
        self.emit("        if (map->occupied[i]) {");
        self.emit(format!("            {k_list}_push(result, map->keys[i]);"));
        self.emit("        }");
        self.emit("    }");
        self.emit("    return result;");
        self.emit("}");
        self.emit_blank();

        let v_list = format!("sl_List_{v_mangled}");
        self.emit(format!("static inline {v_list}* {name}_values({name}* map) {{"));
        self.emit(format!("    {v_list}* result = {v_list}_new();"));
        self.emit("    for (int i = 0; i < map->cap; i++) {");
        self.emit("        if (map->occupied[i]) {");
        self.emit(format!("            {v_list}_push(result, map->values[i]);"));
        self.emit("        }");
        self.emit("    }");
        self.emit("    return result;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_clear({name}* map) {{"));
        self.emit("    for (int i = 0; i < map->cap; i++) map->occupied[i] = false;");
        self.emit("    map->len = 0;");
        self.emit("}");
        self.emit_blank();

        self.emit_raw(slc_runtime::collections::map_for_each(&name, k_type, v_type));
        self.emit_blank();

        self.emit(format!("static inline int {name}_size({name}* map) {{"));
        self.emit("    return map->len;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline bool {name}_isEmpty({name}* map) {{"));
        self.emit("    return map->len == 0;");
        self.emit("}");
        self.emit_blank();

        if self.is_primitive_c_type(v_type) {
            let eq_fn = format!("{name}__val_eq");
            self.emit(format!("static inline bool {eq_fn}({v_type} a, {v_type} b) {{"));
            if v_type == "char*" {
                self.emit("    return strcmp(a, b) == 0;");
            } else {
                self.emit("    return a == b;");
            }
            self.emit("}");
            self.emit_blank();
            self.emit_raw(slc_runtime::collections::map_contains_value(&name, v_type, &eq_fn));
            self.emit_blank();
        }

        self.emit(format!("static inline void {name}_merge({name}* map, {name}* other) {{"));
        self.emit("    for (int i = 0; i < other->cap; i++) {");
        self.emit(format!(
            "        if (other->occupied[i]) {name}_put(map, other->keys[i], other->values[i]);"
        ));
        self.emit("    }");
        self.emit("}");
        self.emit_blank();
    }

    pub fn emit_set_functions(&mut self, c_type: &str, mangled: &str) {
        let name = format!("sl_Set_{mangled}");
        let (hash_expr, eq_expr) = self.hash_and_eq(c_type, "set");

        self.emit(format!("static inline {name}* {name}_new(void) {{"));
        self.emit(format!("    {name}* set = ({name}*)__sl_safe_calloc(1, sizeof({name}));"));
        self.emit("    set->cap = 16;");
        self.emit(format!("    set->keys = ({c_type}*)__sl_safe_calloc((size_t)set->cap, sizeof({c_type}));"));
        self.emit("    set->occupied = (bool*)__sl_safe_calloc((size_t)set->cap, sizeof(bool));");
        self.emit("    return set;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_add({name}* set, {c_type} key);"));
        self.emit_blank();

        self.emit(format!("static inline void {name}_resize({name}* set) {{"));
        self.emit("    int old_cap = set->cap;");
        self.emit(format!("    {c_type}* old_keys = set->keys;"));
        self.emit("    bool* old_occupied = set->occupied;");
        self.emit("    set->cap *= 2;");
        self.emit("    set->len = 0;");
        self.emit(format!("    set->keys = ({c_type}*)__sl_safe_calloc((size_t)set->cap, sizeof({c_type}));"));
        self.emit("    set->occupied = (bool*)__sl_safe_calloc((size_t)set->cap, sizeof(bool));");
        self.emit("    for (int i = 0; i < old_cap; i++) {");
        self.emit("        if (old_occupied[i]) {");
        self.emit(format!("            {name}_add(set, old_keys[i]);"));
        self.emit("        }");
        self.emit("    }");
        self.emit("    free(old_keys);");
        self.emit("    free(old_occupied);");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_add({name}* set, {c_type} key) {{"));
        self.emit(format!("    if (set->len * 4 >= set->cap * 3) {{ {name}_resize(set); }}"));
        self.emit(format!("    int idx = (int)({hash_expr} % (unsigned long)set->cap);"));
        self.emit("    while (set->occupied[idx]) {");
        self.emit(format!("        if ({eq_expr}) return;"));
        self.emit("        idx = (idx + 1) % set->cap;");
        self.emit("    }");
        self.emit("    set->keys[idx] = key;");
        self.emit("    set->occupied[idx] = true;");
        self.emit("    set->len++;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline bool {name}_contains({name}* set, {c_type} key) {{"));
        self.emit(format!("    int idx = (int)({hash_expr} % (unsigned long)set->cap);"));
        self.emit("    while (set->occupied[idx]) {");
        self.emit(format!("        if ({eq_expr}) return true;"));
        self.emit("        idx = (idx + 1) % set->cap;");
        self.emit("    }");
        self.emit("    return false;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline bool {name}_has({name}* set, {c_type} key) {{"));
        self.emit(format!("    return {name}_contains(set, key);"));
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_remove({name}* set, {c_type} key) {{"));
        self.emit(format!("    int idx = (int)({hash_expr} % (unsigned long)set->cap);"));
        self.emit("    while (set->occupied[idx]) {");
        self.emit(format!("        if ({eq_expr}) {{"));
        self.emit("            set->occupied[idx] = false;");
        self.emit("            set->len--;");
        self.emit("            int j = (idx + 1) % set->cap;");
        self.emit("            while (set->occupied[j]) {");
        self.emit(format!("                {c_type} rk = set->keys[j];"));
        self.emit("                set->occupied[j] = false;");
        self.emit("                set->len--;");
        self.emit(format!("                {name}_add(set, rk);"));
        self.emit("                j = (j + 1) % set->cap;");
        self.emit("            }");
        self.emit("            return;");
        self.emit("        }");
        self.emit("        idx = (idx + 1) % set->cap;");
        self.emit("    }");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_free({name}* set) {{"));
        self.emit("    free(set->keys);");
        self.emit("    free(set->occupied);");
        self.emit("    free(set);");
        self.emit("}");
        self.emit_blank();

        let list_name = format!("sl_List_{mangled}");
        self.emit(format!("static inline {list_name}* {name}_toList({name}* set) {{"));
        self.emit(format!("    {list_name}* result = {list_name}_new();"));
        self.emit("    for (int i = 0; i < set->cap; i++) {");
        self.emit("        if (set->occupied[i]) {");
        self.emit(format!("            {list_name}_push(result, set->keys[i]);"));
        self.emit("        }");
        self.emit("    }");
        self.emit("    return result;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline void {name}_clear({name}* set) {{"));
        self.emit("    for (int i = 0; i < set->cap; i++) set->occupied[i] = false;");
        self.emit("    set->len = 0;");
        self.emit("}");
        self.emit_blank();

        self.emit_raw(slc_runtime::collections::set_for_each(&name, c_type));
        self.emit_blank();
        self.emit_raw(slc_runtime::collections::set_filter(&name, c_type));
        self.emit_blank();
        self.emit_raw(slc_runtime::collections::set_any(&name, c_type));
        self.emit_blank();
        self.emit_raw(slc_runtime::collections::set_all(&name, c_type));
        self.emit_blank();
        self.emit_raw(slc_runtime::collections::set_find_index(&name, c_type));
        self.emit_blank();

        self.emit(format!("static inline int {name}_size({name}* set) {{"));
        self.emit("    return set->len;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline bool {name}_isEmpty({name}* set) {{"));
        self.emit("    return set->len == 0;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {name}* {name}_unite({name}* set, {name}* other) {{"));
        self.emit(format!("    {name}* result = {name}_new();"));
        self.emit("    for (int i = 0; i < set->cap; i++) {");
        self.emit(format!("        if (set->occupied[i]) {name}_add(result, set->keys[i]);"));
        self.emit("    }");
        self.emit("    for (int i = 0; i < other->cap; i++) {");
        self.emit(format!("        if (other->occupied[i]) {name}_add(result, other->keys[i]);"));
        self.emit("    }");
        self.emit("    return result;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {name}* {name}_intersect({name}* set, {name}* other) {{"));
        self.emit(format!("    {name}* result = {name}_new();"));
        self.emit("    for (int i = 0; i < set->cap; i++) {");
        self.emit(format!("        if (set->occupied[i] && {name}_contains(other, set->keys[i])) {{"));
        self.emit(format!("            {name}_add(result, set->keys[i]);"));
        self.emit("        }");
        self.emit("    }");
        self.emit("    return result;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {name}* {name}_subtract({name}* set, {name}* other) {{"));
        self.emit(format!("    {name}* result = {name}_new();"));
        self.emit("    for (int i = 0; i < set->cap; i++) {");
        self.emit(format!("        if (set->occupied[i] && !{name}_contains(other, set->keys[i])) {{"));
        self.emit(format!("            {name}_add(result, set->keys[i]);"));
        self.emit("        }");
        self.emit("    }");
        self.emit("    return result;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline bool {name}_isSubsetOf({name}* set, {name}* other) {{"));
        self.emit("    for (int i = 0; i < set->cap; i++) {");
        self.emit(format!("        if (set->occupied[i] && !{name}_contains(other, set->keys[i])) return false;"));
        self.emit("    }");
        self.emit("    return true;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline bool {name}_isSupersetOf({name}* set, {name}* other) {{"));
        self.emit(format!("    return {name}_isSubsetOf(other, set);"));
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {name}* {name}_symmetricDifference({name}* set, {name}* other) {{"));
        self.emit(format!("    {name}* result = {name}_new();"));
        self.emit("    for (int i = 0; i < set->cap; i++) {");
        self.emit(format!("        if (set->occupied[i] && !{name}_contains(other, set->keys[i])) {{"));
        self.emit(format!("            {name}_add(result, set->keys[i]);"));
        self.emit("        }");
        self.emit("    }");
        self.emit("    for (int i = 0; i < other->cap; i++) {");
        self.emit(format!("        if (other->occupied[i] && !{name}_contains(set, other->keys[i])) {{"));
        self.emit(format!("            {name}_add(result, other->keys[i]);"));
        self.emit("        }");
        self.emit("    }");
        self.emit("    return result;");
        self.emit("}");
        self.emit_blank();

        self.emit(format!("static inline {name}* {name}_copy({name}* set) {{"));
        self.emit(format!("    {name}* result = {name}_new();"));
        self.emit("    for (int i = 0; i < set->cap; i++) {");
        self.emit(format!("        if (set->occupied[i]) {name}_add(result, set->keys[i]);"));
        self.emit("    }");
        self.emit("    return result;");
        self.emit("}");
        self.emit_blank();
    }
}
